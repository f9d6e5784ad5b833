//! Budget vs actual variance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::Totals;
use crate::entry::Direction;

/// Whether a variance is good news.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceStatus {
    /// Less spent, or more collected, than budgeted.
    Favorable,
    /// More spent, or less collected, than budgeted.
    Unfavorable,
    /// On budget.
    None,
}

/// Budget vs actual variance of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variance {
    /// Budgeted amount.
    pub budget: Decimal,
    /// Realized amount.
    pub actual: Decimal,
    /// `budget - actual`, whatever the direction.
    pub reste: Decimal,
    /// Share of the budget still to realize, in percent.
    pub reste_percentage: Decimal,
    /// Status.
    pub status: VarianceStatus,
}

impl Variance {
    /// Computes the variance of an inflow or outflow line.
    ///
    /// For outflows a positive reste (under budget) is favorable; for
    /// inflows a negative reste (collected more than budgeted) is.
    #[must_use]
    pub fn new(direction: Direction, budget: Decimal, actual: Decimal) -> Self {
        let reste = budget.saturating_sub(actual);
        let reste_percentage = reste
            .checked_div(budget)
            .and_then(|share| share.checked_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(Decimal::ZERO);

        let status = if reste.is_zero() {
            VarianceStatus::None
        } else if reste.is_sign_positive() == (direction == Direction::Outflow) {
            VarianceStatus::Favorable
        } else {
            VarianceStatus::Unfavorable
        };

        Self {
            budget,
            actual,
            reste,
            reste_percentage,
            status,
        }
    }

    /// Variance of aggregated totals.
    #[must_use]
    pub fn from_totals(direction: Direction, totals: Totals) -> Self {
        Self::new(direction, totals.budget, totals.actual)
    }
}
