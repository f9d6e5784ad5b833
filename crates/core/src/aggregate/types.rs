//! Aggregate result types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use treso_shared::types::CategoryId;

use crate::entry::Direction;

/// Budget and actual of a set of entries over one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    /// Budgeted amount.
    pub budget: Decimal,
    /// Realized amount.
    pub actual: Decimal,
}

impl Totals {
    /// Creates totals.
    #[must_use]
    pub fn new(budget: Decimal, actual: Decimal) -> Self {
        Self { budget, actual }
    }

    /// `budget - actual`.
    #[must_use]
    pub fn reste(&self) -> Decimal {
        self.budget.saturating_sub(self.actual)
    }
}

/// Saturates at `Decimal::MAX` in either direction.
impl std::ops::Add for Totals {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            budget: self.budget.saturating_add(rhs.budget),
            actual: self.actual.saturating_add(rhs.actual),
        }
    }
}

impl std::ops::AddAssign for Totals {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Totals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, t| acc + t)
    }
}

/// Totals of one main category on one side of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    /// Inflow or outflow side.
    pub direction: Direction,
    /// Main category.
    pub category: CategoryId,
    /// Totals.
    pub totals: Totals,
}

/// Inflow and outflow totals of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneralTotals {
    /// Inflow side.
    pub inflow: Totals,
    /// Outflow side.
    pub outflow: Totals,
}

impl GeneralTotals {
    /// Budgeted net cash flow.
    #[must_use]
    pub fn net_budget(&self) -> Decimal {
        self.inflow.budget.saturating_sub(self.outflow.budget)
    }

    /// Realized net cash flow.
    #[must_use]
    pub fn net_actual(&self) -> Decimal {
        self.inflow.actual.saturating_sub(self.outflow.actual)
    }
}
