//! Budgeted amount attributable to a period.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::schedule::Schedule;
use crate::entry::{Entry, FrequencyClass};
use crate::period::dates::span_days;

/// How a recurring entry contributes to a period.
///
/// Call sites differ on which policy they need, so the policy is always
/// explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountPolicy {
    /// Sum the amount once per occurrence date inside the period.
    #[default]
    OccurrenceAccurate,
    /// Count the full amount once for every period the entry's active span
    /// overlaps, without counting occurrences. Used for per-row display.
    FullAmountIfOverlapping,
}

/// Stateless frequency resolver.
pub struct FrequencyResolver;

impl FrequencyResolver {
    /// Budgeted amount of `entry` attributable to `[period_start, period_end)`.
    ///
    /// Malformed entries (no amount, no start date on a dated class, unknown
    /// frequency) contribute zero, as does a total outside `Decimal`'s range.
    #[must_use]
    pub fn amount_for_period(
        entry: &Entry,
        period_start: NaiveDate,
        period_end: NaiveDate,
        policy: AmountPolicy,
    ) -> Decimal {
        let Some(amount) = entry.amount else {
            return Decimal::ZERO;
        };
        if period_start >= period_end {
            return Decimal::ZERO;
        }
        match entry.frequency {
            FrequencyClass::Unknown => Decimal::ZERO,
            FrequencyClass::Irregular => entry
                .payments
                .iter()
                .filter(|p| p.date >= period_start && p.date < period_end)
                .try_fold(Decimal::ZERO, |total, p| total.checked_add(p.amount))
                .unwrap_or_else(|| overflowed(entry)),
            FrequencyClass::OneTime => match entry.start_date {
                Some(anchor) if anchor >= period_start && anchor < period_end => amount,
                _ => Decimal::ZERO,
            },
            _ => match policy {
                AmountPolicy::OccurrenceAccurate => {
                    let count = Self::occurrence_dates(entry, period_start, period_end).len();
                    amount
                        .checked_mul(Decimal::from(count))
                        .unwrap_or_else(|| overflowed(entry))
                }
                AmountPolicy::FullAmountIfOverlapping => {
                    if Self::active_span_overlaps(entry, period_start, period_end) {
                        amount
                    } else {
                        Decimal::ZERO
                    }
                }
            },
        }
    }

    /// Occurrence dates of a recurring entry inside `[period_start, period_end)`.
    ///
    /// Empty for non-recurring classes and entries without a start date.
    #[must_use]
    pub fn occurrence_dates(
        entry: &Entry,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Vec<NaiveDate> {
        match (entry.frequency.step(), entry.start_date) {
            (Some(step), Some(start)) => Schedule::new(start, entry.end_date, step)
                .occurrences_between(period_start, period_end),
            _ => Vec::new(),
        }
    }

    /// Share of `amount` spread evenly over `[span_start, span_end)` that falls
    /// in `[period_start, period_end)`, by calendar days.
    ///
    /// `amount * overlap / duration`, zero for an empty span, no overlap or
    /// a product outside `Decimal`'s range.
    #[must_use]
    pub fn prorate(
        amount: Decimal,
        span_start: NaiveDate,
        span_end: NaiveDate,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Decimal {
        let duration = span_days(span_start, span_end);
        if duration == 0 {
            return Decimal::ZERO;
        }
        let overlap = span_days(span_start.max(period_start), span_end.min(period_end));
        if overlap == 0 {
            return Decimal::ZERO;
        }
        amount
            .checked_mul(Decimal::from(overlap))
            .and_then(|scaled| scaled.checked_div(Decimal::from(duration)))
            .unwrap_or_else(|| {
                warn!(%amount, overlap, duration, "Prorated amount overflowed, counted as zero");
                Decimal::ZERO
            })
    }

    /// VAT of `entry` attributable to `[period_start, period_end)`.
    ///
    /// A recurring entry with a bounded span spreads its total VAT (amount per
    /// occurrence times the number of occurrences in the span) evenly over
    /// the span by calendar days. Every other entry resolves its VAT amount
    /// occurrence by occurrence.
    #[must_use]
    pub fn vat_for_period(entry: &Entry, period_start: NaiveDate, period_end: NaiveDate) -> Decimal {
        let bounded_span = match (entry.start_date, entry.end_exclusive()) {
            (Some(start), Some(end)) if entry.frequency.is_recurring() && start < end => {
                Some((start, end))
            }
            _ => None,
        };
        match (bounded_span, entry.amount) {
            (Some((start, end)), Some(amount)) => {
                let occurrences = Self::occurrence_dates(entry, start, end).len();
                match amount.checked_mul(Decimal::from(occurrences)) {
                    Some(total) => Self::prorate(total, start, end, period_start, period_end),
                    None => overflowed(entry),
                }
            }
            _ => Self::amount_for_period(
                entry,
                period_start,
                period_end,
                AmountPolicy::OccurrenceAccurate,
            ),
        }
    }

    fn active_span_overlaps(entry: &Entry, period_start: NaiveDate, period_end: NaiveDate) -> bool {
        let Some(start) = entry.start_date else {
            return false;
        };
        let starts_in_time = start < period_end;
        let not_ended = entry.end_date.is_none_or(|end| end >= period_start);
        starts_in_time && not_ended
    }
}

fn overflowed(entry: &Entry) -> Decimal {
    warn!(entry = %entry.id, "Period amount overflowed, counted as zero");
    Decimal::ZERO
}
