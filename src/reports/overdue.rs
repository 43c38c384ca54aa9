//! Overdue debt report
//!
//! For each unit, sums the unpaid shares of expenses dated before the start
//! of the current calendar month. The month boundary goes through the
//! configured [`CalendarSystem`] so a building run on the Jalali calendar
//! gets Jalali month boundaries.

use chrono::NaiveDate;

use crate::allocation::unit_share;
use crate::models::{Building, CalendarSystem, Money, PaymentStatus, UnitId};

/// One unit's overdue position
#[derive(Debug, Clone, PartialEq)]
pub struct OverdueEntry {
    /// The indebted unit
    pub unit_id: UnitId,
    /// Display name at report time
    pub unit_name: String,
    /// Unit number, used for ordering
    pub unit_number: u32,
    /// Total unpaid share over past-month expenses
    pub amount: Money,
    /// Number of expenses contributing to the debt
    pub expense_count: usize,
}

/// Overdue debts per unit, oldest month boundary applied
#[derive(Debug, Clone, PartialEq)]
pub struct OverdueReport {
    /// First day of the current calendar month; debts are expenses dated
    /// strictly before this
    pub month_start: NaiveDate,
    /// Entries with a nonzero overdue amount, ordered by unit number
    pub entries: Vec<OverdueEntry>,
    /// Sum over all entries
    pub total: Money,
}

impl OverdueReport {
    /// Compute overdue debts as of `today` under the given calendar
    pub fn generate(building: &Building, today: NaiveDate, calendar: CalendarSystem) -> Self {
        let month_start = calendar.month_start(today);

        let mut entries = Vec::new();
        for unit in &building.units {
            let mut amount = Money::zero();
            let mut expense_count = 0;

            for expense in &building.expenses {
                if expense.date >= month_start {
                    continue;
                }
                if expense.status_for(unit.id) == PaymentStatus::Paid {
                    continue;
                }
                let share = unit_share(expense, unit, &building.units);
                if !share.is_zero() {
                    amount += share;
                    expense_count += 1;
                }
            }

            // Units that owe nothing stay out of the report
            if !amount.is_zero() {
                entries.push(OverdueEntry {
                    unit_id: unit.id,
                    unit_name: unit.display_name(),
                    unit_number: unit.unit_number,
                    amount,
                    expense_count,
                });
            }
        }

        entries.sort_by_key(|e| e.unit_number);
        let total = entries.iter().map(|e| e.amount).sum();

        Self {
            month_start,
            entries,
            total,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        if self.entries.is_empty() {
            return format!("No overdue debts before {}.\n", self.month_start);
        }

        let mut output = String::new();
        output.push_str(&format!("Overdue Debts (before {})\n", self.month_start));
        output.push_str(&"=".repeat(52));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>15} {:>10}\n",
            "Unit", "Amount", "Expenses"
        ));
        output.push_str(&"-".repeat(52));
        output.push('\n');

        for entry in &self.entries {
            output.push_str(&format!(
                "{:<24} {:>15} {:>10}\n",
                entry.unit_name,
                entry.amount.to_string(),
                entry.expense_count
            ));
        }

        output.push_str(&"-".repeat(52));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>15}\n", "TOTAL", self.total.to_string()));

        output
    }
}
