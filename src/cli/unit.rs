//! Unit CLI commands

use clap::Subcommand;

use crate::display::format_unit_list;
use crate::error::{StrataError, StrataResult};
use crate::models::UnitName;
use crate::services::{BuildingService, UnitDraft};
use crate::storage::Storage;

/// Unit subcommands
#[derive(Subcommand)]
pub enum UnitCommands {
    /// Add a unit to a building
    Add {
        /// Building name or ID
        building: String,
        /// Custom unit name
        #[arg(short, long)]
        name: Option<String>,
        /// Floor area in square meters
        #[arg(short, long, default_value = "100.0")]
        area: f64,
        /// Number of occupants
        #[arg(short, long, default_value = "2")]
        occupants: u32,
        /// Owner's name
        #[arg(long, default_value = "")]
        owner: String,
        /// Tenant's name (omit for an owner-occupied unit)
        #[arg(short, long)]
        tenant: Option<String>,
    },
    /// Edit an existing unit
    Edit {
        /// Building name or ID
        building: String,
        /// Unit number
        number: u32,
        /// New custom unit name
        #[arg(short, long)]
        name: Option<String>,
        /// New floor area in square meters
        #[arg(short, long)]
        area: Option<f64>,
        /// New occupant count
        #[arg(short, long)]
        occupants: Option<u32>,
        /// New owner's name
        #[arg(long)]
        owner: Option<String>,
        /// New tenant's name
        #[arg(short, long)]
        tenant: Option<String>,
        /// Clear the tenant, making the unit owner-occupied
        #[arg(long, conflicts_with = "tenant")]
        no_tenant: bool,
    },
    /// List a building's units
    List {
        /// Building name or ID
        building: String,
    },
}

/// Handle a unit command
pub fn handle_unit_command(storage: &Storage, cmd: UnitCommands) -> StrataResult<()> {
    let service = BuildingService::new(storage);

    match cmd {
        UnitCommands::Add {
            building,
            name,
            area,
            occupants,
            owner,
            tenant,
        } => {
            let found = service
                .find_building(&building)?
                .ok_or_else(|| StrataError::building_not_found(&building))?;

            let draft = UnitDraft {
                name: name.map(UnitName::Custom).unwrap_or_default(),
                area,
                occupants,
                owner_name: owner,
                tenant_name: tenant,
            };
            let unit = service.add_unit(found.id, draft)?;

            println!("Added {} to {}", unit.display_name(), found.name);
            println!("  Number:    {}", unit.unit_number);
            println!("  Area:      {:.1}", unit.area);
            println!("  Occupants: {}", unit.occupants);
        }

        UnitCommands::Edit {
            building,
            number,
            name,
            area,
            occupants,
            owner,
            tenant,
            no_tenant,
        } => {
            let found = service
                .find_building(&building)?
                .ok_or_else(|| StrataError::building_not_found(&building))?;

            let current = found
                .unit_by_number(number)
                .ok_or_else(|| StrataError::unit_not_found(format!("number {}", number)))?;

            let tenant_name = if no_tenant {
                None
            } else {
                tenant.or_else(|| current.tenant_name.clone())
            };

            let draft = UnitDraft {
                name: name.map(UnitName::Custom).unwrap_or_else(|| current.name.clone()),
                area: area.unwrap_or(current.area),
                occupants: occupants.unwrap_or(current.occupants),
                owner_name: owner.unwrap_or_else(|| current.owner_name.clone()),
                tenant_name,
            };

            let updated = service.update_unit(found.id, current.id, draft)?;
            println!("Updated {}", updated.display_name());
        }

        UnitCommands::List { building } => {
            let found = service
                .find_building(&building)?
                .ok_or_else(|| StrataError::building_not_found(&building))?;

            println!("{}", format_unit_list(&found.units));
        }
    }

    Ok(())
}
