//! Occurrence schedules of recurring entries.
//!
//! Monthly-family occurrences are always computed from the original start
//! date (`start + k * step` months, day clamped), never from the previous
//! occurrence, so a 31st anchor yields Feb 29, Mar 31, Apr 30, ...

use chrono::NaiveDate;

use crate::entry::Step;
use crate::period::dates::{add_days, add_months, month_index};

/// Upper bound on occurrences produced by a single walk.
pub const MAX_OCCURRENCES: usize = 10_000;

/// A recurring schedule anchored on a start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// First occurrence.
    pub start: NaiveDate,
    /// Last day an occurrence may fall on (inclusive).
    pub until: Option<NaiveDate>,
    /// Increment between occurrences.
    pub step: Step,
}

impl Schedule {
    /// Creates a schedule.
    #[must_use]
    pub const fn new(start: NaiveDate, until: Option<NaiveDate>, step: Step) -> Self {
        Self { start, until, step }
    }

    /// The `k`-th occurrence, ignoring `until`.
    #[must_use]
    pub fn nth(&self, k: i64) -> Option<NaiveDate> {
        match self.step {
            Step::Days(days) => add_days(self.start, k.checked_mul(days)?),
            Step::Months(months) => {
                let shift = i32::try_from(k).ok()?.checked_mul(months)?;
                add_months(self.start, shift)
            }
        }
    }

    /// Occurrences falling in `[from, to)`, in ascending order.
    #[must_use]
    pub fn occurrences_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        if from >= to {
            return dates;
        }
        let mut k = self.first_candidate(from);
        while dates.len() < MAX_OCCURRENCES {
            let Some(date) = self.nth(k) else {
                break;
            };
            if date >= to || self.until.is_some_and(|until| date > until) {
                break;
            }
            if date >= from {
                dates.push(date);
            }
            k += 1;
        }
        dates
    }

    /// Index of an occurrence at or before the first one on/after `from`.
    fn first_candidate(&self, from: NaiveDate) -> i64 {
        if from <= self.start {
            return 0;
        }
        match self.step {
            Step::Days(days) if days > 0 => {
                let elapsed = (from - self.start).num_days();
                elapsed.div_euclid(days)
            }
            Step::Months(months) if months > 0 => {
                let elapsed = month_index(from) - month_index(self.start);
                i64::from(elapsed.div_euclid(months))
            }
            _ => 0,
        }
    }
}
