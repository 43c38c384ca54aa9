//! Expense display formatting
//!
//! Table views over the expense ledger, including the per-unit share
//! breakdown derived from the allocation engine.

use tabled::{settings::Style, Table, Tabled};

use crate::allocation::{total_contribution, unit_share};
use crate::models::{Building, DistributionMethod, Expense, PaymentStatus};

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "METHOD")]
    method: String,
    #[tabled(rename = "CHARGE TO")]
    charge_to: String,
    #[tabled(rename = "PAID")]
    paid: String,
}

/// Format a list of expenses as a table
pub fn format_expense_list(expenses: &[&Expense]) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let rows: Vec<ExpenseRow> = expenses
        .iter()
        .map(|e| {
            let paid = if e.distribution_method == DistributionMethod::General {
                "-".to_string()
            } else {
                let paid_count = e
                    .payment_status
                    .values()
                    .filter(|s| **s == PaymentStatus::Paid)
                    .count();
                format!("{}/{}", paid_count, e.payment_status.len())
            };

            ExpenseRow {
                id: e.id.to_string(),
                date: e.date.to_string(),
                description: e.description.clone(),
                total: total_contribution(e).to_string(),
                method: e.distribution_method.to_string(),
                charge_to: e.charge_to.to_string(),
                paid,
            }
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[derive(Tabled)]
struct ShareRow {
    #[tabled(rename = "#")]
    number: u32,
    #[tabled(rename = "UNIT")]
    unit: String,
    #[tabled(rename = "SHARE")]
    share: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// Format the per-unit share breakdown of one expense
pub fn format_share_breakdown(building: &Building, expense: &Expense) -> String {
    let mut output = format!(
        "{} ({}, total {})\n",
        expense.description,
        expense.date,
        total_contribution(expense)
    );

    if expense.distribution_method == DistributionMethod::General {
        output.push_str("General expense; not attributed to any unit.\n");
        return output;
    }

    let rows: Vec<ShareRow> = building
        .units
        .iter()
        .filter_map(|unit| {
            let share = unit_share(expense, unit, &building.units);
            if share.is_zero() {
                return None;
            }
            Some(ShareRow {
                number: unit.unit_number,
                unit: unit.display_name(),
                share: share.to_string(),
                status: expense.status_for(unit.id).to_string(),
            })
        })
        .collect();

    if rows.is_empty() {
        output.push_str("No unit owes a share of this expense.\n");
        return output;
    }

    output.push_str(&Table::new(rows).with(Style::rounded()).to_string());
    output.push('\n');
    output
}
