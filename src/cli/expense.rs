//! Expense CLI commands

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::Settings;
use crate::display::format_expense_list;
use crate::error::{StrataError, StrataResult};
use crate::models::{Building, ChargeTo, DistributionMethod, Expense, Money, PaymentStatus, UnitId};
use crate::services::{BuildingService, ExpenseDraft};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense to a building
    Add {
        /// Building name or ID
        building: String,
        /// What the expense was for
        description: String,
        /// Amount (per unit for the custom method, aggregate otherwise)
        amount: String,
        /// Expense date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Distribution method (unit_count, occupants, area, custom, general)
        #[arg(short, long, default_value = "unit_count")]
        method: String,
        /// Who is liable (all, owner, tenant)
        #[arg(short, long, default_value = "all")]
        charge_to: String,
        /// The manager paid this out of pocket
        #[arg(long)]
        paid_by_manager: bool,
        /// Count this as a building charge (fund inflow)
        #[arg(long)]
        building_charge: bool,
        /// Pay this out of the building fund (fund outflow)
        #[arg(long)]
        deduct_from_fund: bool,
        /// Selected unit numbers for the custom method (comma-separated)
        #[arg(short, long)]
        units: Option<String>,
    },
    /// Edit an existing expense
    Edit {
        /// Building name or ID
        building: String,
        /// Expense ID
        expense: String,
        /// New description
        #[arg(long)]
        description: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New distribution method
        #[arg(short, long)]
        method: Option<String>,
        /// New charge-to scope
        #[arg(short, long)]
        charge_to: Option<String>,
        /// Set or clear the paid-by-manager flag (true/false)
        #[arg(long)]
        paid_by_manager: Option<bool>,
        /// Set or clear the building-charge flag (true/false)
        #[arg(long)]
        building_charge: Option<bool>,
        /// Set or clear the deduct-from-fund flag (true/false)
        #[arg(long)]
        deduct_from_fund: Option<bool>,
        /// New selected unit numbers for the custom method (comma-separated)
        #[arg(short, long)]
        units: Option<String>,
    },
    /// Delete an expense
    Delete {
        /// Building name or ID
        building: String,
        /// Expense ID
        expense: String,
    },
    /// List a building's expenses
    List {
        /// Building name or ID
        building: String,
        /// Filter by year in the configured calendar
        #[arg(short, long)]
        year: Option<i32>,
        /// Filter by month in the configured calendar (requires --year)
        #[arg(short, long, requires = "year")]
        month: Option<u32>,
        /// Only expenses the manager paid out of pocket
        #[arg(long)]
        manager_only: bool,
    },
    /// Mark a unit's share of an expense as paid or unpaid
    Mark {
        /// Building name or ID
        building: String,
        /// Expense ID
        expense: String,
        /// Unit number
        unit: u32,
        /// New status (paid, unpaid)
        status: String,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> StrataResult<()> {
    let service = BuildingService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            building,
            description,
            amount,
            date,
            method,
            charge_to,
            paid_by_manager,
            building_charge,
            deduct_from_fund,
            units,
        } => {
            let found = find_building(&service, &building)?;

            let draft = ExpenseDraft {
                description,
                total_amount: parse_amount(&amount)?,
                date: parse_date(date.as_deref())?,
                distribution_method: parse_method(&method)?,
                charge_to: parse_charge_to(&charge_to)?,
                paid_by_manager,
                is_building_charge: building_charge,
                deduct_from_fund,
                applicable_units: match units {
                    Some(spec) => resolve_unit_numbers(&found, &spec)?,
                    None => Vec::new(),
                },
            };

            let expense = service.add_expense(found.id, draft)?;

            println!("Added expense: {}", expense.description);
            println!("  Amount: {}", expense.total_amount);
            println!("  Method: {}", expense.distribution_method);
            println!("  Date:   {}", expense.date);
            println!("  ID:     {}", expense.id);
        }

        ExpenseCommands::Edit {
            building,
            expense,
            description,
            amount,
            date,
            method,
            charge_to,
            paid_by_manager,
            building_charge,
            deduct_from_fund,
            units,
        } => {
            let found = find_building(&service, &building)?;
            let current = find_expense(&found, &expense)?;

            let draft = ExpenseDraft {
                description: description.unwrap_or_else(|| current.description.clone()),
                total_amount: match amount {
                    Some(a) => parse_amount(&a)?,
                    None => current.total_amount,
                },
                date: match date {
                    Some(d) => parse_date(Some(&d))?,
                    None => current.date,
                },
                distribution_method: match method {
                    Some(m) => parse_method(&m)?,
                    None => current.distribution_method,
                },
                charge_to: match charge_to {
                    Some(c) => parse_charge_to(&c)?,
                    None => current.charge_to,
                },
                paid_by_manager: paid_by_manager.unwrap_or(current.paid_by_manager),
                is_building_charge: building_charge.unwrap_or(current.is_building_charge),
                deduct_from_fund: deduct_from_fund.unwrap_or(current.deduct_from_fund),
                applicable_units: match units {
                    Some(spec) => resolve_unit_numbers(&found, &spec)?,
                    None => current.applicable_units.clone(),
                },
            };

            let updated = service.update_expense(found.id, current.id, draft)?;
            println!("Updated expense: {}", updated.description);
        }

        ExpenseCommands::Delete { building, expense } => {
            let found = find_building(&service, &building)?;
            let current = find_expense(&found, &expense)?;

            service.delete_expense(found.id, current.id)?;
            println!("Deleted expense: {}", current.description);
        }

        ExpenseCommands::List {
            building,
            year,
            month,
            manager_only,
        } => {
            let found = find_building(&service, &building)?;
            let calendar = settings.calendar;

            let expenses: Vec<&Expense> = found
                .expenses
                .iter()
                .filter(|e| {
                    let (e_year, e_month) = calendar.year_month(e.date);
                    if let Some(y) = year {
                        if e_year != y {
                            return false;
                        }
                    }
                    if let Some(m) = month {
                        if e_month != m {
                            return false;
                        }
                    }
                    !manager_only || e.paid_by_manager
                })
                .collect();

            println!("{}", format_expense_list(&expenses));
        }

        ExpenseCommands::Mark {
            building,
            expense,
            unit,
            status,
        } => {
            let found = find_building(&service, &building)?;
            let current = find_expense(&found, &expense)?;

            let unit_id = found
                .unit_by_number(unit)
                .map(|u| u.id)
                .ok_or_else(|| StrataError::unit_not_found(format!("number {}", unit)))?;

            let status = PaymentStatus::parse(&status).ok_or_else(|| {
                StrataError::Validation(format!(
                    "Invalid status: '{}'. Valid values: paid, unpaid",
                    status
                ))
            })?;

            service.set_payment_status(found.id, current.id, unit_id, status)?;
            println!(
                "Marked unit {} as {} for '{}'",
                unit, status, current.description
            );
        }
    }

    Ok(())
}

fn find_building(service: &BuildingService, identifier: &str) -> StrataResult<Building> {
    service
        .find_building(identifier)?
        .ok_or_else(|| StrataError::building_not_found(identifier))
}

/// Find an expense by full UUID, prefixed form, or the short display form
fn find_expense(building: &Building, identifier: &str) -> StrataResult<Expense> {
    building
        .expenses
        .iter()
        .find(|e| {
            e.id.to_string() == identifier
                || identifier
                    .parse()
                    .map(|id| e.id == id)
                    .unwrap_or(false)
        })
        .cloned()
        .ok_or_else(|| StrataError::expense_not_found(identifier))
}

fn parse_amount(s: &str) -> StrataResult<Money> {
    Money::parse(s)
        .map_err(|e| StrataError::Validation(format!("Invalid amount: '{}'. {}", s, e)))
}

fn parse_date(s: Option<&str>) -> StrataResult<NaiveDate> {
    match s {
        Some(s) => s.parse().map_err(|_| {
            StrataError::Validation(format!("Invalid date: '{}'. Use YYYY-MM-DD", s))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn parse_method(s: &str) -> StrataResult<DistributionMethod> {
    DistributionMethod::parse(s).ok_or_else(|| {
        StrataError::Validation(format!(
            "Invalid distribution method: '{}'. Valid methods: unit_count, occupants, area, custom, general",
            s
        ))
    })
}

fn parse_charge_to(s: &str) -> StrataResult<ChargeTo> {
    ChargeTo::parse(s).ok_or_else(|| {
        StrataError::Validation(format!(
            "Invalid charge-to scope: '{}'. Valid scopes: all, owner, tenant",
            s
        ))
    })
}

/// Resolve a comma-separated list of unit numbers to unit ids
fn resolve_unit_numbers(building: &Building, spec: &str) -> StrataResult<Vec<UnitId>> {
    spec.split(',')
        .map(|part| {
            let number: u32 = part.trim().parse().map_err(|_| {
                StrataError::Validation(format!("Invalid unit number: '{}'", part.trim()))
            })?;
            building
                .unit_by_number(number)
                .map(|u| u.id)
                .ok_or_else(|| StrataError::unit_not_found(format!("number {}", number)))
        })
        .collect()
}
