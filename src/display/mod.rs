//! Terminal display formatting
//!
//! Table and detail views built with `tabled` rows. Report structs render
//! themselves via their own `format_terminal` methods; this module covers
//! the entity listings.

pub mod building;
pub mod expense;
pub mod unit;

pub use building::{format_building_details, format_building_list};
pub use expense::{format_expense_list, format_share_breakdown};
pub use unit::format_unit_list;
