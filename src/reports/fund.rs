//! Building fund report
//!
//! Derives the fund's inflow, outflow, and balance from the expense ledger.
//! Nothing here is stored; the report is recomputed from the building on
//! every request so it can never drift from the underlying ledger.

use crate::allocation::total_contribution;
use crate::models::{Building, Money};

/// Fund position of a building
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundReport {
    /// Sum of building-charge expenses
    pub inflow: Money,
    /// Sum of expenses paid out of the fund
    pub outflow: Money,
    /// Inflow minus outflow; negative means the manager has overspent
    pub balance: Money,
    /// Number of expenses contributing to inflow
    pub charge_count: usize,
    /// Number of expenses contributing to outflow
    pub deduction_count: usize,
}

impl FundReport {
    /// Compute the fund position from a building's expense ledger
    pub fn generate(building: &Building) -> Self {
        let mut inflow = Money::zero();
        let mut outflow = Money::zero();
        let mut charge_count = 0;
        let mut deduction_count = 0;

        for expense in &building.expenses {
            let contribution = total_contribution(expense);
            if expense.is_building_charge {
                inflow += contribution;
                charge_count += 1;
            }
            if expense.deduct_from_fund {
                outflow += contribution;
                deduction_count += 1;
            }
        }

        Self {
            inflow,
            outflow,
            balance: inflow - outflow,
            charge_count,
            deduction_count,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Building Fund\n");
        output.push_str(&"=".repeat(40));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:>15}  ({} expenses)\n",
            "Inflow:", self.inflow, self.charge_count
        ));
        output.push_str(&format!(
            "{:<12} {:>15}  ({} expenses)\n",
            "Outflow:", self.outflow, self.deduction_count
        ));
        output.push_str(&"-".repeat(40));
        output.push('\n');
        output.push_str(&format!("{:<12} {:>15}\n", "Balance:", self.balance));

        if self.balance.is_negative() {
            output.push_str("\nThe fund is overdrawn.\n");
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BuildingId, ChargeTo, DistributionMethod, Expense, ExpenseId, Money,
    };
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn expense(
        building: &Building,
        amount: i64,
        method: DistributionMethod,
        is_building_charge: bool,
        deduct_from_fund: bool,
    ) -> Expense {
        Expense {
            id: ExpenseId::new(),
            building_id: building.id,
            description: "Test".to_string(),
            total_amount: Money::new(amount),
            date: NaiveDate::from_ymd_opt(2025, 4, 10).unwrap(),
            distribution_method: method,
            charge_to: ChargeTo::All,
            paid_by_manager: false,
            is_building_charge,
            deduct_from_fund,
            applicable_units: Vec::new(),
            payment_status: BTreeMap::new(),
        }
    }

    #[test]
    fn test_balance_is_inflow_minus_outflow() {
        let mut building = Building::new("Maple House", 5);
        building.expenses.push(expense(
            &building,
            500000,
            DistributionMethod::UnitCount,
            true,
            false,
        ));
        building.expenses.push(expense(
            &building,
            120000,
            DistributionMethod::General,
            false,
            true,
        ));

        let report = FundReport::generate(&building);
        assert_eq!(report.inflow, Money::new(500000));
        assert_eq!(report.outflow, Money::new(120000));
        assert_eq!(report.balance, Money::new(380000));
    }

    #[test]
    fn test_balance_may_go_negative() {
        let mut building = Building::new("Maple House", 2);
        building.expenses.push(expense(
            &building,
            50000,
            DistributionMethod::UnitCount,
            true,
            false,
        ));
        building.expenses.push(expense(
            &building,
            200000,
            DistributionMethod::General,
            false,
            true,
        ));

        let report = FundReport::generate(&building);
        assert_eq!(report.balance, Money::new(-150000));
        assert!(report.format_terminal().contains("overdrawn"));
    }

    #[test]
    fn test_custom_contribution_uses_selected_unit_count() {
        let mut building = Building::new("Maple House", 3);
        let mut charge = expense(&building, 100000, DistributionMethod::Custom, true, false);
        charge.applicable_units = vec![building.units[0].id, building.units[1].id];
        building.expenses.push(charge);

        let report = FundReport::generate(&building);
        // Per-unit 100000 across 2 selected units -> aggregate 200000
        assert_eq!(report.inflow, Money::new(200000));
    }

    #[test]
    fn test_unflagged_expenses_do_not_move_the_fund() {
        let mut building = Building::new("Maple House", 2);
        building.expenses.push(expense(
            &building,
            75000,
            DistributionMethod::UnitCount,
            false,
            false,
        ));

        let report = FundReport::generate(&building);
        assert_eq!(report.inflow, Money::zero());
        assert_eq!(report.outflow, Money::zero());
        assert_eq!(report.balance, Money::zero());
    }
}
