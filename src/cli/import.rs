//! Import CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{StrataError, StrataResult};
use crate::export::import_workbook;
use crate::services::BuildingService;
use crate::storage::Storage;

/// Import subcommands
#[derive(Subcommand)]
pub enum ImportCommands {
    /// Import a JSON backup
    ///
    /// An array replaces the whole collection; a single building object is
    /// merged by ID.
    Json {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Import a workbook directory of CSV sheets as one building
    Workbook {
        /// Path to the workbook directory
        dir: PathBuf,
    },
}

/// Handle an import command
pub fn handle_import_command(storage: &Storage, cmd: ImportCommands) -> StrataResult<()> {
    let service = BuildingService::new(storage);

    match cmd {
        ImportCommands::Json { file } => {
            let contents = std::fs::read_to_string(&file)
                .map_err(|e| StrataError::Import(format!("{}: {}", file.display(), e)))?;

            service.import_json(&contents)?;

            let count = service.list_buildings()?.len();
            println!(
                "Import complete. The collection now holds {} building(s).",
                count
            );
        }

        ImportCommands::Workbook { dir } => {
            let building = import_workbook(&dir)?;
            let name = building.name.clone();

            service.import_building(building)?;
            println!("Imported building '{}' from {}", name, dir.display());
        }
    }

    Ok(())
}
