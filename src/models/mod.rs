//! Core data models
//!
//! Buildings, units, and expenses, plus the supporting value types
//! (ids, money, calendar systems) they are built from.

pub mod building;
pub mod calendar;
pub mod expense;
pub mod ids;
pub mod money;
pub mod unit;

pub use building::Building;
pub use calendar::CalendarSystem;
pub use expense::{ChargeTo, DistributionMethod, Expense, ExpenseValidationError, PaymentStatus};
pub use ids::{BuildingId, ExpenseId, UnitId};
pub use money::{Money, MoneyParseError};
pub use unit::{Unit, UnitName, UnitValidationError};
