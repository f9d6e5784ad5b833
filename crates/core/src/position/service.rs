//! Cash position propagation.

use rust_decimal::Decimal;

use super::types::{PeriodFlows, PeriodPosition, PositionSeries};
use crate::period::Period;

/// Stateless cash position propagator.
pub struct CashPositionPropagator;

impl CashPositionPropagator {
    /// One position per period, folded left to right from
    /// `starting_balance`.
    ///
    /// Periods without flows have a zero net cash flow; extra flows are
    /// ignored.
    #[must_use]
    pub fn propagate(
        periods: &[Period],
        starting_balance: Decimal,
        flows: &[PeriodFlows],
    ) -> Vec<PeriodPosition> {
        let mut positions: Vec<PeriodPosition> = Vec::with_capacity(periods.len());
        for index in 0..periods.len() {
            let period_flows = flows.get(index).copied().unwrap_or_default();
            let position = match positions.last() {
                None => PeriodPosition::opening(starting_balance, period_flows),
                Some(previous) => PeriodPosition::next(previous, period_flows),
            };
            positions.push(position);
        }
        positions
    }

    /// Budget and actual series, each propagated on its own flows from the
    /// same starting balance.
    #[must_use]
    pub fn propagate_series(
        periods: &[Period],
        starting_balance: Decimal,
        budget_flows: &[PeriodFlows],
        actual_flows: &[PeriodFlows],
    ) -> PositionSeries {
        let budget = Self::propagate(periods, starting_balance, budget_flows);
        let actual = Self::propagate(periods, starting_balance, actual_flows);
        let reste = budget
            .iter()
            .zip(&actual)
            .map(|(b, a)| b.final_balance.saturating_sub(a.final_balance))
            .collect();
        PositionSeries {
            budget,
            actual,
            reste,
        }
    }
}
