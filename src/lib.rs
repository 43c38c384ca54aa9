//! strata-ledger: building expense bookkeeping for the command line
//!
//! Keeps a collection of buildings, their units, and their expense ledgers,
//! allocates each expense across units with configurable distribution
//! methods, and derives fund and overdue reports from the ledger.

pub mod allocation;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{StrataError, StrataResult};
