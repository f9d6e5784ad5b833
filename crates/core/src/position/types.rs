//! Cash position types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inflow and outflow totals of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodFlows {
    /// Total inflow.
    pub inflow: Decimal,
    /// Total outflow.
    pub outflow: Decimal,
}

impl PeriodFlows {
    /// Creates flows.
    #[must_use]
    pub fn new(inflow: Decimal, outflow: Decimal) -> Self {
        Self { inflow, outflow }
    }

    /// `inflow - outflow`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.inflow.saturating_sub(self.outflow)
    }
}

/// Cash position of one period.
///
/// `final = initial + net_cash_flow`, and the initial balance of a period is
/// the final balance of the one before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPosition {
    /// Balance at the start of the period.
    pub initial: Decimal,
    /// Balance at the end of the period.
    #[serde(rename = "final")]
    pub final_balance: Decimal,
    /// `total_inflow - total_outflow`.
    pub net_cash_flow: Decimal,
    /// Total inflow.
    pub total_inflow: Decimal,
    /// Total outflow.
    pub total_outflow: Decimal,
}

impl PeriodPosition {
    /// Position of the first period.
    #[must_use]
    pub fn opening(initial: Decimal, flows: PeriodFlows) -> Self {
        let net = flows.net();
        Self {
            initial,
            final_balance: initial.saturating_add(net),
            net_cash_flow: net,
            total_inflow: flows.inflow,
            total_outflow: flows.outflow,
        }
    }

    /// Position of the period following `previous`.
    #[must_use]
    pub fn next(previous: &Self, flows: PeriodFlows) -> Self {
        Self::opening(previous.final_balance, flows)
    }
}

/// Budget and actual cash positions over the same periods.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PositionSeries {
    /// Forecast positions.
    pub budget: Vec<PeriodPosition>,
    /// Realized positions.
    pub actual: Vec<PeriodPosition>,
    /// Budget final minus actual final, per period.
    pub reste: Vec<Decimal>,
}
