//! Expense model
//!
//! Represents one cost event to be allocated across a building's units,
//! together with the policy describing how it is split and who owes it.
//! Optional-field defaults (`charge_to`, flags, maps) are applied once at
//! the serde boundary so downstream code never re-derives them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::ids::{BuildingId, ExpenseId, UnitId};
use super::money::Money;

/// Policy for dividing an expense's cost among units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionMethod {
    /// Split the total evenly across eligible units
    UnitCount,
    /// Weight by occupant count
    Occupants,
    /// Weight by floor area
    Area,
    /// A fixed amount per selected unit; `total_amount` is per unit here
    Custom,
    /// A building-wide expense attributed to no unit
    General,
}

impl DistributionMethod {
    /// Parse a distribution method from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unit_count" | "units" => Some(Self::UnitCount),
            "occupants" => Some(Self::Occupants),
            "area" => Some(Self::Area),
            "custom" => Some(Self::Custom),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl fmt::Display for DistributionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnitCount => write!(f, "unit_count"),
            Self::Occupants => write!(f, "occupants"),
            Self::Area => write!(f, "area"),
            Self::Custom => write!(f, "custom"),
            Self::General => write!(f, "general"),
        }
    }
}

/// Which class of resident is liable for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChargeTo {
    /// Every unit, regardless of tenancy
    #[default]
    All,
    /// Only owner-occupied units
    Owner,
    /// Only units with a tenant
    Tenant,
}

impl ChargeTo {
    /// Parse a charge-to scope from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(Self::All),
            "owner" => Some(Self::Owner),
            "tenant" => Some(Self::Tenant),
            _ => None,
        }
    }
}

impl fmt::Display for ChargeTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Owner => write!(f, "owner"),
            Self::Tenant => write!(f, "tenant"),
        }
    }
}

/// Per-unit payment state for an expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Share settled by the unit
    Paid,
    /// Share outstanding; this is the default for absent entries
    #[default]
    Unpaid,
}

impl PaymentStatus {
    /// Parse a payment status from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "paid" => Some(Self::Paid),
            "unpaid" => Some(Self::Unpaid),
            _ => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paid => write!(f, "paid"),
            Self::Unpaid => write!(f, "unpaid"),
        }
    }
}

/// One cost event to be allocated across units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// The building this expense belongs to
    pub building_id: BuildingId,

    /// What the expense was for
    pub description: String,

    /// For `custom` distribution this is the amount **per selected unit**;
    /// for every other method it is the aggregate to be split
    pub total_amount: Money,

    /// When the expense occurred
    pub date: NaiveDate,

    /// How the cost is divided among units
    pub distribution_method: DistributionMethod,

    /// Who is liable for this expense
    #[serde(default)]
    pub charge_to: ChargeTo,

    /// Whether the manager paid this out of pocket
    #[serde(default)]
    pub paid_by_manager: bool,

    /// Whether this expense is a building charge contributing to fund inflow
    #[serde(default)]
    pub is_building_charge: bool,

    /// Whether this expense is paid out of the building fund (fund outflow)
    #[serde(default)]
    pub deduct_from_fund: bool,

    /// For `custom`: the selected units; for other methods: a snapshot of
    /// all unit ids at creation time
    #[serde(default)]
    pub applicable_units: Vec<UnitId>,

    /// Payment status per unit; absent entries mean unpaid
    #[serde(default)]
    pub payment_status: BTreeMap<UnitId, PaymentStatus>,
}

impl Expense {
    /// Payment status for a unit, defaulting to unpaid when absent
    pub fn status_for(&self, unit_id: UnitId) -> PaymentStatus {
        self.payment_status
            .get(&unit_id)
            .copied()
            .unwrap_or_default()
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.description.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyDescription);
        }

        if !self.total_amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(
                self.total_amount.amount(),
            ));
        }

        Ok(())
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyDescription,
    NonPositiveAmount(i64),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "Expense description cannot be empty"),
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_expense() -> Expense {
        Expense {
            id: ExpenseId::new(),
            building_id: BuildingId::new(),
            description: "Elevator repair".to_string(),
            total_amount: Money::new(450000),
            date: NaiveDate::from_ymd_opt(2025, 5, 14).unwrap(),
            distribution_method: DistributionMethod::UnitCount,
            charge_to: ChargeTo::All,
            paid_by_manager: false,
            is_building_charge: false,
            deduct_from_fund: false,
            applicable_units: Vec::new(),
            payment_status: BTreeMap::new(),
        }
    }

    #[test]
    fn test_status_for_defaults_to_unpaid() {
        let mut expense = sample_expense();
        let paid_unit = UnitId::new();
        let other_unit = UnitId::new();
        expense.payment_status.insert(paid_unit, PaymentStatus::Paid);

        assert_eq!(expense.status_for(paid_unit), PaymentStatus::Paid);
        assert_eq!(expense.status_for(other_unit), PaymentStatus::Unpaid);
    }

    #[test]
    fn test_validation() {
        let mut expense = sample_expense();
        assert!(expense.validate().is_ok());

        expense.description = "  ".to_string();
        assert_eq!(
            expense.validate(),
            Err(ExpenseValidationError::EmptyDescription)
        );

        expense.description = "Water bill".to_string();
        expense.total_amount = Money::zero();
        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::NonPositiveAmount(_))
        ));
    }

    #[test]
    fn test_defaults_applied_at_deserialization() {
        // Older documents lack the charge-to scope and the fund flags; serde
        // fills them in so no call site has to
        let json = format!(
            r#"{{
                "id": "{}",
                "building_id": "{}",
                "description": "Cleaning",
                "total_amount": 80000,
                "date": "2025-04-01",
                "distribution_method": "unit_count"
            }}"#,
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4()
        );

        let expense: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(expense.charge_to, ChargeTo::All);
        assert!(!expense.paid_by_manager);
        assert!(!expense.is_building_charge);
        assert!(!expense.deduct_from_fund);
        assert!(expense.applicable_units.is_empty());
        assert!(expense.payment_status.is_empty());
    }

    #[test]
    fn test_method_parse_and_display() {
        assert_eq!(
            DistributionMethod::parse("unit_count"),
            Some(DistributionMethod::UnitCount)
        );
        assert_eq!(
            DistributionMethod::parse("AREA"),
            Some(DistributionMethod::Area)
        );
        assert_eq!(DistributionMethod::parse("weird"), None);
        assert_eq!(DistributionMethod::Occupants.to_string(), "occupants");
    }

    #[test]
    fn test_serde_snake_case_method_names() {
        let expense = sample_expense();
        let json = serde_json::to_string(&expense).unwrap();
        assert!(json.contains("\"unit_count\""));

        let deserialized: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(expense, deserialized);
    }
}
