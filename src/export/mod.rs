//! Export and import formats
//!
//! JSON backups and the CSV workbook directory.

pub mod json;
pub mod workbook;

pub use json::export_buildings_json;
pub use workbook::{export_workbook, import_workbook};
