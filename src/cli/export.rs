//! Export CLI commands

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{StrataError, StrataResult};
use crate::export::{export_buildings_json, export_workbook};
use crate::services::BuildingService;
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand)]
pub enum ExportCommands {
    /// Export buildings as a JSON backup
    Json {
        /// Building name or ID (omit for the whole collection)
        #[arg(short, long)]
        building: Option<String>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export one building as a workbook directory of CSV sheets
    Workbook {
        /// Building name or ID
        building: String,
        /// Output directory
        output: PathBuf,
    },
}

/// Handle an export command
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> StrataResult<()> {
    let service = BuildingService::new(storage);

    match cmd {
        ExportCommands::Json { building, output } => {
            let building_id = match building {
                Some(identifier) => Some(
                    service
                        .find_building(&identifier)?
                        .ok_or_else(|| StrataError::building_not_found(&identifier))?
                        .id,
                ),
                None => None,
            };

            match output {
                Some(path) => {
                    let mut file = std::fs::File::create(&path)
                        .map_err(|e| StrataError::Export(e.to_string()))?;
                    export_buildings_json(storage, &mut file, building_id)?;
                    println!("Exported to {}", path.display());
                }
                None => {
                    let mut stdout = std::io::stdout();
                    export_buildings_json(storage, &mut stdout, building_id)?;
                    println!();
                }
            }
        }

        ExportCommands::Workbook { building, output } => {
            let found = service
                .find_building(&building)?
                .ok_or_else(|| StrataError::building_not_found(&building))?;

            export_workbook(&found, &output)?;
            println!(
                "Exported {} sheets for '{}' to {}",
                4 + found.units.len(),
                found.name,
                output.display()
            );
        }
    }

    Ok(())
}
