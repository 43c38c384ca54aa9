use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use strata_ledger::cli::{
    handle_building_command, handle_expense_command, handle_export_command,
    handle_import_command, handle_report_command, handle_unit_command,
};
use strata_ledger::config::{paths::StrataPaths, settings::Settings};
use strata_ledger::models::CalendarSystem;
use strata_ledger::storage::Storage;

#[derive(Parser)]
#[command(
    name = "strata",
    version,
    about = "Building expense bookkeeping for the command line",
    long_about = "strata-ledger keeps a collection of buildings, their units, and \
                  their expense ledgers. Expenses are allocated across units with \
                  configurable distribution methods, and fund and overdue reports \
                  are derived from the ledger on demand."
)]
struct Cli {
    /// Override the data directory
    #[arg(long, global = true, env = "STRATA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Building management commands
    #[command(subcommand, alias = "bld")]
    Building(strata_ledger::cli::BuildingCommands),

    /// Unit management commands
    #[command(subcommand)]
    Unit(strata_ledger::cli::UnitCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(strata_ledger::cli::ExpenseCommands),

    /// Report commands
    #[command(subcommand)]
    Report(strata_ledger::cli::ReportCommands),

    /// Export commands
    #[command(subcommand)]
    Export(strata_ledger::cli::ExportCommands),

    /// Import commands
    #[command(subcommand)]
    Import(strata_ledger::cli::ImportCommands),

    /// Initialize the data directory
    Init,

    /// Show or change configuration
    Config {
        /// Set the calendar system (gregorian, jalali)
        #[arg(long)]
        calendar: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = StrataPaths::resolve(cli.data_dir)?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Building(cmd)) => {
            handle_building_command(&storage, cmd)?;
        }
        Some(Commands::Unit(cmd)) => {
            handle_unit_command(&storage, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, cmd)?;
        }
        Some(Commands::Import(cmd)) => {
            handle_import_command(&storage, cmd)?;
        }
        Some(Commands::Init) => {
            println!("Initializing strata-ledger at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Create your first building:");
            println!("  strata building add \"My Building\" --units 4");
        }
        Some(Commands::Config { calendar }) => {
            let mut settings = settings;

            if let Some(value) = calendar {
                let calendar = CalendarSystem::parse(&value).ok_or_else(|| {
                    strata_ledger::StrataError::Validation(format!(
                        "Invalid calendar system: '{}'. Valid systems: gregorian, jalali",
                        value
                    ))
                })?;
                settings.calendar = calendar;
                settings.save(&paths)?;
                println!("Calendar system set to {}", settings.calendar);
                println!();
            }

            println!("strata-ledger Configuration");
            println!("===========================");
            println!("Data directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!();
            println!("Settings:");
            println!("  Calendar:    {}", settings.calendar);
            println!("  Date format: {}", settings.date_format);
        }
        None => {
            println!("strata-ledger - Building expense bookkeeping");
            println!();
            println!("Run 'strata --help' for usage information.");
        }
    }

    Ok(())
}
