//! CLI command handlers
//!
//! One subcommand family per entity, each with its own module.

pub mod building;
pub mod expense;
pub mod export;
pub mod import;
pub mod report;
pub mod unit;

pub use building::{handle_building_command, BuildingCommands};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use import::{handle_import_command, ImportCommands};
pub use report::{handle_report_command, ReportCommands};
pub use unit::{handle_unit_command, UnitCommands};
