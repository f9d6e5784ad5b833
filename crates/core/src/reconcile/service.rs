//! Actual reconciler service.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::trace;

use super::matcher::{ActualMatcher, DEFAULT_MATCHERS};
use super::types::ActualSources;
use crate::entry::Entry;

/// Stateless actual reconciler.
pub struct ActualReconciler;

impl ActualReconciler {
    /// Realized amount of `entry` in `[period_start, period_end)`.
    ///
    /// Strategies are consulted in priority order and the first one with a
    /// record linked to the entry wins, even when its total for this period
    /// is zero. Entries nothing links to yield zero.
    #[must_use]
    pub fn actual_amount_for_period(
        entry: &Entry,
        period_start: NaiveDate,
        period_end: NaiveDate,
        sources: &ActualSources,
    ) -> Decimal {
        Self::resolve(DEFAULT_MATCHERS, entry, period_start, period_end, sources)
            .map_or(Decimal::ZERO, |(_, amount)| amount)
    }

    /// Name of the strategy that decides the actual amount of `entry`.
    #[must_use]
    pub fn matching_strategy(
        entry: &Entry,
        period_start: NaiveDate,
        period_end: NaiveDate,
        sources: &ActualSources,
    ) -> Option<&'static str> {
        Self::resolve(DEFAULT_MATCHERS, entry, period_start, period_end, sources)
            .map(|(name, _)| name)
    }

    /// Runs a custom strategy chain.
    #[must_use]
    pub fn resolve(
        matchers: &[&dyn ActualMatcher],
        entry: &Entry,
        period_start: NaiveDate,
        period_end: NaiveDate,
        sources: &ActualSources,
    ) -> Option<(&'static str, Decimal)> {
        matchers.iter().find_map(|matcher| {
            let amount = matcher.matched_amount(entry, period_start, period_end, sources)?;
            trace!(entry = %entry.id, strategy = matcher.name(), %amount, "Actual matched");
            Some((matcher.name(), amount))
        })
    }
}
