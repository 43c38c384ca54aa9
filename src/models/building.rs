//! Building model
//!
//! The aggregate root: a building exclusively owns its ordered unit and
//! expense collections. No cross-building references exist.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::Expense;
use super::ids::{BuildingId, ExpenseId, UnitId};
use super::unit::Unit;

/// A building with its units and expense ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Unique identifier
    pub id: BuildingId,

    /// Building name
    pub name: String,

    /// Ordered unit collection
    #[serde(default)]
    pub units: Vec<Unit>,

    /// Ordered expense collection
    #[serde(default)]
    pub expenses: Vec<Expense>,
}

impl Building {
    /// Create a building with `unit_count` seeded units
    pub fn new(name: impl Into<String>, unit_count: u32) -> Self {
        Self {
            id: BuildingId::new(),
            name: name.into(),
            units: (1..=unit_count).map(Unit::seeded).collect(),
            expenses: Vec::new(),
        }
    }

    /// Find a unit by id
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id == id)
    }

    /// Find a unit by its sequential number
    pub fn unit_by_number(&self, number: u32) -> Option<&Unit> {
        self.units.iter().find(|u| u.unit_number == number)
    }

    /// Find an expense by id
    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// The unit number an added unit should receive
    pub fn next_unit_number(&self) -> u32 {
        self.units
            .iter()
            .map(|u| u.unit_number)
            .max()
            .map_or(1, |n| n + 1)
    }

    /// Number of vacant units (no tenant and zero occupants)
    pub fn vacant_unit_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_vacant()).count()
    }

    /// Validate the building and everything it owns
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Building name cannot be empty".to_string());
        }

        for unit in &self.units {
            unit.validate()
                .map_err(|e| format!("Unit {}: {}", unit.unit_number, e))?;
        }

        for expense in &self.expenses {
            expense
                .validate()
                .map_err(|e| format!("Expense '{}': {}", expense.description, e))?;
            if expense.building_id != self.id {
                return Err(format!(
                    "Expense '{}' belongs to another building",
                    expense.description
                ));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Building {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} units)", self.name, self.units.len())
    }
}
