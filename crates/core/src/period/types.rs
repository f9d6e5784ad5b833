//! Period types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::span_days;

/// Granularity tag carried by every generated period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// One calendar day.
    Day,
    /// A Monday-based week, possibly clipped to a month boundary.
    Week,
    /// Two consecutive weeks.
    Fortnight,
    /// Days 1-15 or 16-end of a month.
    HalfMonth,
    /// One calendar month.
    Month,
    /// Three calendar months aligned on January.
    Quarter,
    /// Six calendar months aligned on January.
    Semester,
    /// One calendar year.
    Year,
}

/// A half-open calendar window `[start_date, end_date)`.
///
/// Produced by the period calendar; immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// Display label. Informational only.
    pub label: String,
    /// First day of the period (inclusive).
    pub start_date: NaiveDate,
    /// First day after the period (exclusive).
    pub end_date: NaiveDate,
    /// Granularity of the window.
    pub granularity: Granularity,
}

impl Period {
    /// Creates a new period.
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        granularity: Granularity,
    ) -> Self {
        Self {
            label: label.into(),
            start_date,
            end_date,
            granularity,
        }
    }

    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date < self.end_date
    }

    /// Number of days covered by the period.
    #[must_use]
    pub fn days(&self) -> i64 {
        span_days(self.start_date, self.end_date)
    }

    /// Number of days shared with `[start, end_exclusive)`.
    #[must_use]
    pub fn overlap_days(&self, start: NaiveDate, end_exclusive: NaiveDate) -> i64 {
        span_days(start.max(self.start_date), end_exclusive.min(self.end_date))
    }

    /// Returns true if the period shares at least one day with
    /// `[start, end_exclusive)`.
    #[must_use]
    pub fn overlaps(&self, start: NaiveDate, end_exclusive: NaiveDate) -> bool {
        self.overlap_days(start, end_exclusive) > 0
    }
}
