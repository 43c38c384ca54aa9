//! Unit model
//!
//! Represents one occupiable unit in a building, with the attributes the
//! allocation engine depends on: floor area, occupant count, and tenancy.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UnitId;

/// Display name for a unit, decided once at creation time
///
/// A freshly seeded unit carries no name of its own and renders as
/// "Unit {number}"; a renamed unit carries the literal string. Keeping this
/// as a tagged variant means no code ever has to guess from string shape
/// whether a name is a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum UnitName {
    /// No custom name; rendered from the unit number
    Default,
    /// A user-supplied name
    Custom(String),
}

impl Default for UnitName {
    fn default() -> Self {
        Self::Default
    }
}

/// One occupiable unit in a building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Unique identifier
    pub id: UnitId,

    /// Display name
    #[serde(default)]
    pub name: UnitName,

    /// Sequential unit number within the building
    pub unit_number: u32,

    /// Floor area in square meters
    pub area: f64,

    /// Number of occupants (0 for an empty unit)
    pub occupants: u32,

    /// Owner's name
    #[serde(default)]
    pub owner_name: String,

    /// Tenant's name; `None` means the unit is owner-occupied
    #[serde(default)]
    pub tenant_name: Option<String>,
}

impl Unit {
    /// Create a unit with the bulk-creation defaults
    pub fn seeded(unit_number: u32) -> Self {
        Self {
            id: UnitId::new(),
            name: UnitName::Default,
            unit_number,
            area: 100.0,
            occupants: 2,
            owner_name: String::new(),
            tenant_name: None,
        }
    }

    /// The name shown in tables and reports
    pub fn display_name(&self) -> String {
        match &self.name {
            UnitName::Default => format!("Unit {}", self.unit_number),
            UnitName::Custom(name) => name.clone(),
        }
    }

    /// A unit with no tenant is owner-occupied
    pub fn is_owner_occupied(&self) -> bool {
        self.tenant_name.is_none()
    }

    /// A unit with no tenant and zero occupants is vacant
    pub fn is_vacant(&self) -> bool {
        self.tenant_name.is_none() && self.occupants == 0
    }

    /// Validate the unit
    pub fn validate(&self) -> Result<(), UnitValidationError> {
        if let UnitName::Custom(name) = &self.name {
            if name.trim().is_empty() {
                return Err(UnitValidationError::EmptyName);
            }
        }

        if self.area <= 0.0 || !self.area.is_finite() {
            return Err(UnitValidationError::InvalidArea(self.area));
        }

        Ok(())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (#{})", self.display_name(), self.unit_number)
    }
}

/// Validation errors for units
#[derive(Debug, Clone, PartialEq)]
pub enum UnitValidationError {
    EmptyName,
    InvalidArea(f64),
}

impl fmt::Display for UnitValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Unit name cannot be empty"),
            Self::InvalidArea(area) => write!(f, "Unit area must be positive, got {}", area),
        }
    }
}

impl std::error::Error for UnitValidationError {}
