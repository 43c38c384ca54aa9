//! Expense allocation engine
//!
//! Pure functions computing a unit's monetary share of one expense. All of
//! them are deterministic and side-effect-free; they never mutate their
//! arguments and hold no state, so callers may evaluate them as often as
//! they like.
//!
//! Shares are rounded **up** to the nearest [`ROUNDING_STEP`] so collected
//! amounts never fall short of the expense; the sum over all eligible units
//! may exceed the expense total by up to one step per unit, which is
//! accepted rather than redistributed.

use crate::models::{ChargeTo, DistributionMethod, Expense, Money, Unit};

/// Currency granularity shares are rounded up to
pub const ROUNDING_STEP: i64 = 500;

/// Whether a unit is liable under a charge-to scope
fn is_charged(unit: &Unit, charge_to: ChargeTo) -> bool {
    match charge_to {
        ChargeTo::All => true,
        ChargeTo::Owner => unit.is_owner_occupied(),
        ChargeTo::Tenant => !unit.is_owner_occupied(),
    }
}

/// The subset of `all_units` that participates in this expense's allocation
///
/// This is the single charge-to filter; [`unit_share`] uses it for both the
/// eligibility gate and the divisional denominators, so the two can never
/// disagree.
pub fn eligible_units<'a>(expense: &Expense, all_units: &'a [Unit]) -> Vec<&'a Unit> {
    all_units
        .iter()
        .filter(|u| is_charged(u, expense.charge_to))
        .collect()
}

/// Round a raw share up to the nearest [`ROUNDING_STEP`] multiple
///
/// A true zero stays exactly zero; rounding must never turn "owes nothing"
/// into a positive amount.
fn round_up(raw: f64) -> Money {
    if raw == 0.0 {
        return Money::zero();
    }
    let step = ROUNDING_STEP as f64;
    Money::new(((raw / step).ceil() as i64) * ROUNDING_STEP)
}

/// Compute one unit's share of one expense
///
/// `all_units` must be the building's full unit list; it supplies the
/// denominators for the divisional methods.
pub fn unit_share(expense: &Expense, unit: &Unit, all_units: &[Unit]) -> Money {
    // Eligibility gate: a unit outside the charge-to scope owes nothing
    if !is_charged(unit, expense.charge_to) {
        return Money::zero();
    }

    let raw = match expense.distribution_method {
        // General expenses are never attributed to a unit
        DistributionMethod::General => 0.0,

        // Custom: total_amount is already per selected unit, no division
        DistributionMethod::Custom => {
            if expense.applicable_units.contains(&unit.id) {
                expense.total_amount.amount() as f64
            } else {
                0.0
            }
        }

        DistributionMethod::UnitCount | DistributionMethod::Occupants | DistributionMethod::Area => {
            let eligible = eligible_units(expense, all_units);
            if !eligible.iter().any(|u| u.id == unit.id) {
                return Money::zero();
            }

            let total = expense.total_amount.amount() as f64;
            match expense.distribution_method {
                DistributionMethod::UnitCount => {
                    if eligible.is_empty() {
                        0.0
                    } else {
                        total / eligible.len() as f64
                    }
                }
                DistributionMethod::Occupants => {
                    let total_occupants: u32 = eligible.iter().map(|u| u.occupants).sum();
                    if total_occupants == 0 {
                        0.0
                    } else {
                        total * unit.occupants as f64 / total_occupants as f64
                    }
                }
                DistributionMethod::Area => {
                    let total_area: f64 = eligible.iter().map(|u| u.area).sum();
                    if total_area <= 0.0 {
                        0.0
                    } else {
                        total * unit.area / total_area
                    }
                }
                _ => unreachable!(),
            }
        }
    };

    round_up(raw)
}

/// The aggregate value one expense represents
///
/// For `custom` distribution the stored amount is per selected unit, so the
/// aggregate is amount times selected-unit count (zero when the list is
/// empty). Every other method stores the aggregate directly.
pub fn total_contribution(expense: &Expense) -> Money {
    match expense.distribution_method {
        DistributionMethod::Custom => {
            expense.total_amount * expense.applicable_units.len() as i64
        }
        _ => expense.total_amount,
    }
}
