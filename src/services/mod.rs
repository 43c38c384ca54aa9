//! Service layer
//!
//! Business logic sitting between the CLI and storage.

pub mod building;

pub use building::{BuildingService, ExpenseDraft, UnitDraft};
