//! JSON backup export
//!
//! Writes the persisted document shape (`Vec<Building>`, pretty-printed) to
//! any writer, either the full collection or a single building. Import of
//! the same shape goes through [`crate::services::BuildingService`], which
//! also accepts a single building object and merges it by id.

use std::io::Write;

use crate::error::{StrataError, StrataResult};
use crate::models::BuildingId;
use crate::storage::Storage;

/// Export buildings to JSON
///
/// With a building id, writes that building alone; otherwise writes the
/// whole collection as an array.
pub fn export_buildings_json<W: Write>(
    storage: &Storage,
    writer: &mut W,
    building_id: Option<BuildingId>,
) -> StrataResult<()> {
    match building_id {
        Some(id) => {
            let building = storage
                .buildings
                .get(id)?
                .ok_or_else(|| StrataError::building_not_found(id.to_string()))?;
            serde_json::to_writer_pretty(writer, &building)
        }
        None => {
            let all = storage.buildings.get_all()?;
            serde_json::to_writer_pretty(writer, &all)
        }
    }
    .map_err(|e| StrataError::Export(e.to_string()))?;

    Ok(())
}
