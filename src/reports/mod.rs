//! Derived, read-only views over a building's ledger
//!
//! Reports are recomputed from the unit and expense collections on demand
//! and never stored, so there is no second source of truth to drift.

pub mod fund;
pub mod overdue;

pub use fund::FundReport;
pub use overdue::{OverdueEntry, OverdueReport};
