//! Building CLI commands

use clap::Subcommand;

use crate::display::{format_building_details, format_building_list, format_unit_list};
use crate::error::{StrataError, StrataResult};
use crate::services::BuildingService;
use crate::storage::Storage;

/// Building subcommands
#[derive(Subcommand)]
pub enum BuildingCommands {
    /// Create a new building with seeded units
    Add {
        /// Building name
        name: String,
        /// Number of units to seed
        #[arg(short, long, default_value = "1")]
        units: u32,
    },
    /// List all buildings
    List,
    /// Show building details
    Show {
        /// Building name or ID
        building: String,
    },
}

/// Handle a building command
pub fn handle_building_command(storage: &Storage, cmd: BuildingCommands) -> StrataResult<()> {
    let service = BuildingService::new(storage);

    match cmd {
        BuildingCommands::Add { name, units } => {
            let building = service.create_building(&name, units)?;

            println!("Created building: {}", building.name);
            println!("  Units: {}", building.units.len());
            println!("  ID:    {}", building.id);
        }

        BuildingCommands::List => {
            let buildings = service.list_buildings()?;
            println!("{}", format_building_list(&buildings));
        }

        BuildingCommands::Show { building } => {
            let found = service
                .find_building(&building)?
                .ok_or_else(|| StrataError::building_not_found(&building))?;

            print!("{}", format_building_details(&found));
            println!();
            println!("{}", format_unit_list(&found.units));
        }
    }

    Ok(())
}
