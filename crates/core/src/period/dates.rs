//! Calendar arithmetic shared by the period calendar and the frequency
//! resolver.
//!
//! Month arithmetic clamps the day of month to the last valid day of the
//! target month (Jan 31 + 1 month = Feb 29 in a leap year).

use chrono::{Datelike, Duration, Months, NaiveDate};

/// Returns the number of days in the given month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_next| first_next.pred_opt())
        .map_or(28, |last| last.day())
}

/// Shifts a date by a signed number of months, clamping the day of month.
///
/// Returns `None` only when the result leaves chrono's supported range.
#[must_use]
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Shifts a date by a signed number of days.
#[must_use]
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Index of the month counted from year 0, used for month differences.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// First day of the date's month.
#[must_use]
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Monday on or before the date.
#[must_use]
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let delta = i64::from(date.weekday().num_days_from_monday());
    date - Duration::days(delta)
}

/// First day of the block of `block_months` months containing the date,
/// blocks being aligned on January.
#[must_use]
pub fn start_of_month_block(date: NaiveDate, block_months: u32) -> NaiveDate {
    let block = block_months.max(1);
    let month = (date.month0() / block) * block + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
}

/// January 1st of the date's year.
#[must_use]
pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    start_of_month_block(date, 12)
}

/// Number of days in `[start, end)`, zero when the range is empty.
#[must_use]
pub fn span_days(start: NaiveDate, end_exclusive: NaiveDate) -> i64 {
    (end_exclusive - start).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(add_months(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(add_months(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        assert_eq!(add_months(date(2024, 1, 31), 2), Some(date(2024, 3, 31)));
        assert_eq!(add_months(date(2024, 3, 31), -1), Some(date(2024, 2, 29)));
        assert_eq!(add_months(date(2024, 11, 15), 3), Some(date(2025, 2, 15)));
    }

    #[test]
    fn test_block_starts() {
        assert_eq!(start_of_week(date(2024, 3, 10)), date(2024, 3, 4));
        assert_eq!(start_of_week(date(2024, 3, 4)), date(2024, 3, 4));
        assert_eq!(start_of_month_block(date(2024, 5, 20), 3), date(2024, 4, 1));
        assert_eq!(start_of_month_block(date(2024, 4, 20), 2), date(2024, 3, 1));
        assert_eq!(start_of_month_block(date(2024, 8, 1), 6), date(2024, 7, 1));
        assert_eq!(start_of_year(date(2024, 8, 1)), date(2024, 1, 1));
    }

    #[test]
    fn test_span_days() {
        assert_eq!(span_days(date(2024, 2, 1), date(2024, 3, 1)), 29);
        assert_eq!(span_days(date(2024, 3, 1), date(2024, 2, 1)), 0);
    }

    #[test]
    fn test_month_index_difference() {
        assert_eq!(month_index(date(2025, 2, 1)) - month_index(date(2024, 11, 30)), 3);
    }
}
