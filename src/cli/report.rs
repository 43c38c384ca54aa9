//! Report CLI commands

use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_share_breakdown;
use crate::error::{StrataError, StrataResult};
use crate::reports::{FundReport, OverdueReport};
use crate::services::BuildingService;
use crate::storage::Storage;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Fund position and occupancy summary
    Summary {
        /// Building name or ID
        building: String,
    },
    /// Per-unit overdue debts from before the current calendar month
    Overdue {
        /// Building name or ID
        building: String,
        /// Compute as of this date instead of today (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Per-unit share breakdown of expenses
    Shares {
        /// Building name or ID
        building: String,
        /// Limit to one expense ID
        #[arg(short, long)]
        expense: Option<String>,
    },
}

/// Handle a report command
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> StrataResult<()> {
    let service = BuildingService::new(storage);

    match cmd {
        ReportCommands::Summary { building } => {
            let found = service
                .find_building(&building)?
                .ok_or_else(|| StrataError::building_not_found(&building))?;

            let fund = FundReport::generate(&found);
            println!("{} ({} units)", found.name, found.units.len());
            println!("Vacant units: {}", found.vacant_unit_count());
            println!();
            print!("{}", fund.format_terminal());
        }

        ReportCommands::Overdue { building, date } => {
            let found = service
                .find_building(&building)?
                .ok_or_else(|| StrataError::building_not_found(&building))?;

            let today = match date {
                Some(s) => s.parse().map_err(|_| {
                    StrataError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", s))
                })?,
                None => chrono::Local::now().date_naive(),
            };

            let report = OverdueReport::generate(&found, today, settings.calendar);
            print!("{}", report.format_terminal());
        }

        ReportCommands::Shares { building, expense } => {
            let found = service
                .find_building(&building)?
                .ok_or_else(|| StrataError::building_not_found(&building))?;

            match expense {
                Some(identifier) => {
                    let expense = found
                        .expenses
                        .iter()
                        .find(|e| {
                            e.id.to_string() == identifier
                                || identifier.parse().map(|id| e.id == id).unwrap_or(false)
                        })
                        .ok_or_else(|| StrataError::expense_not_found(&identifier))?;
                    print!("{}", format_share_breakdown(&found, expense));
                }
                None => {
                    if found.expenses.is_empty() {
                        println!("No expenses found.");
                    }
                    for expense in &found.expenses {
                        print!("{}", format_share_breakdown(&found, expense));
                        println!();
                    }
                }
            }
        }
    }

    Ok(())
}
