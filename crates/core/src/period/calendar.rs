//! Period calendar generation.
//!
//! Every view computes a base anchor aligned on the requested date, shifts it
//! by `offset` whole units and emits consecutive, contiguous windows.

use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dates::{
    add_days, add_months, days_in_month, start_of_month, start_of_month_block, start_of_week,
    start_of_year,
};
use super::error::CalendarError;
use super::types::{Granularity, Period};

/// Number of weeks emitted by the bimester view.
const BIMESTER_WEEKS: u32 = 8;

/// Last day of the first half of a month in the half-month view.
const HALF_MONTH_SPLIT_DAY: u32 = 15;

/// A requested calendar layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CalendarView {
    /// One row per day.
    Day,
    /// One row per Monday-based week.
    Week,
    /// One row per two-week block.
    Fortnight,
    /// One row per calendar month.
    Month,
    /// Each month split into Monday-based weeks clipped to the month.
    MonthByWeek,
    /// Eight weeks starting on the Monday on/before the bimester start.
    Bimester,
    /// One row per quarter.
    Quarter,
    /// Each month of the quarter split into 1-15 and 16-end.
    QuarterHalfMonth,
    /// One row per semester.
    Semester,
    /// One row per year.
    Year,
    /// A 3, 5 or 7 year window, per year or per semester.
    MultiYear {
        /// Number of years covered.
        years: u32,
        /// Emit semester rows instead of year rows.
        by_semester: bool,
    },
}

impl CalendarView {
    /// Creates a multi-year view.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::UnsupportedYears` unless `years` is 3, 5 or 7.
    pub fn multi_year(years: u32, by_semester: bool) -> Result<Self, CalendarError> {
        if matches!(years, 3 | 5 | 7) {
            Ok(Self::MultiYear { years, by_semester })
        } else {
            Err(CalendarError::UnsupportedYears(years))
        }
    }
}

impl FromStr for CalendarView {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace(['-', ' '], "_");
        match name.as_str() {
            "day" | "jour" => Ok(Self::Day),
            "week" | "semaine" => Ok(Self::Week),
            "fortnight" | "quinzaine" => Ok(Self::Fortnight),
            "month" | "mois" => Ok(Self::Month),
            "month_by_week" => Ok(Self::MonthByWeek),
            "bimester" | "bimestre" => Ok(Self::Bimester),
            "quarter" | "trimester" | "trimestre" => Ok(Self::Quarter),
            "quarter_half_month" | "trimester_half_month" => Ok(Self::QuarterHalfMonth),
            "semester" | "semestre" => Ok(Self::Semester),
            "year" | "annee" => Ok(Self::Year),
            other => parse_multi_year(other).ok_or_else(|| CalendarError::UnknownView(s.into()))?,
        }
    }
}

/// Parses `3_years`, `5_years_by_semester`, ...
fn parse_multi_year(name: &str) -> Option<Result<CalendarView, CalendarError>> {
    let (count, rest) = name.split_once("_years")?;
    let years = count.parse::<u32>().ok()?;
    let by_semester = match rest {
        "" => false,
        "_by_semester" => true,
        _ => return None,
    };
    Some(CalendarView::multi_year(years, by_semester))
}

/// Stateless period calendar.
pub struct PeriodCalendar;

impl PeriodCalendar {
    /// Generates the periods of `view` around `anchor`.
    ///
    /// `offset` shifts the base anchor by whole units of the view; `horizon`
    /// counts top-level units (`0` is treated as `1`). Bimester and
    /// multi-year views have a fixed row count and ignore `horizon`.
    #[must_use]
    pub fn generate(view: CalendarView, anchor: NaiveDate, offset: i32, horizon: u32) -> Vec<Period> {
        let horizon = horizon.max(1);
        let offset = i64::from(offset);
        match view {
            CalendarView::Day => {
                let start = add_days(anchor, offset);
                day_steps(start, 1, horizon, Granularity::Day)
            }
            CalendarView::Week => {
                let start = add_days(start_of_week(anchor), offset * 7);
                day_steps(start, 7, horizon, Granularity::Week)
            }
            CalendarView::Fortnight => {
                let start = add_days(start_of_week(anchor), offset * 14);
                day_steps(start, 14, horizon, Granularity::Fortnight)
            }
            CalendarView::Month => {
                let start = shift_months(start_of_month(anchor), offset, 1);
                month_steps(start, 1, horizon, Granularity::Month)
            }
            CalendarView::MonthByWeek => {
                let start = shift_months(start_of_month(anchor), offset, 1);
                month_steps(start, 1, horizon, Granularity::Month)
                    .iter()
                    .flat_map(split_into_weeks)
                    .collect()
            }
            CalendarView::Bimester => {
                let bimester = shift_months(start_of_month_block(anchor, 2), offset, 2);
                let start = bimester.map(start_of_week);
                day_steps(start, 7, BIMESTER_WEEKS, Granularity::Week)
            }
            CalendarView::Quarter => {
                let start = shift_months(start_of_month_block(anchor, 3), offset, 3);
                month_steps(start, 3, horizon, Granularity::Quarter)
            }
            CalendarView::QuarterHalfMonth => {
                let start = shift_months(start_of_month_block(anchor, 3), offset, 3);
                month_steps(start, 1, horizon.saturating_mul(3), Granularity::Month)
                    .iter()
                    .flat_map(split_into_halves)
                    .collect()
            }
            CalendarView::Semester => {
                let start = shift_months(start_of_month_block(anchor, 6), offset, 6);
                month_steps(start, 6, horizon, Granularity::Semester)
            }
            CalendarView::Year => {
                let start = shift_months(start_of_year(anchor), offset, 12);
                month_steps(start, 12, horizon, Granularity::Year)
            }
            CalendarView::MultiYear { years, by_semester } => {
                let step = i64::from(years) * 12;
                let start = shift_months(start_of_year(anchor), offset, step);
                if by_semester {
                    month_steps(start, 6, years * 2, Granularity::Semester)
                } else {
                    month_steps(start, 12, years, Granularity::Year)
                }
            }
        }
    }

    /// Generates periods from a view name.
    ///
    /// An unknown name falls back to a single one-day period at `anchor`.
    #[must_use]
    pub fn generate_named(name: &str, anchor: NaiveDate, offset: i32, horizon: u32) -> Vec<Period> {
        match name.parse::<CalendarView>() {
            Ok(view) => Self::generate(view, anchor, offset, horizon),
            Err(err) => {
                debug!(view = name, error = %err, "Falling back to a single-day calendar");
                Self::generate(CalendarView::Day, anchor, 0, 1)
            }
        }
    }
}

fn shift_months(base: NaiveDate, offset: i64, unit_months: i64) -> Option<NaiveDate> {
    let months = i32::try_from(offset.checked_mul(unit_months)?).ok()?;
    add_months(base, months)
}

fn day_steps(
    start: Option<NaiveDate>,
    step_days: i64,
    count: u32,
    granularity: Granularity,
) -> Vec<Period> {
    let Some(start) = start else {
        return Vec::new();
    };
    (0..i64::from(count))
        .map_while(|i| {
            let from = add_days(start, i * step_days)?;
            let to = add_days(from, step_days)?;
            Some(Period::new(label(granularity, from, to), from, to, granularity))
        })
        .collect()
}

fn month_steps(
    start: Option<NaiveDate>,
    step_months: i32,
    count: u32,
    granularity: Granularity,
) -> Vec<Period> {
    let Some(start) = start else {
        return Vec::new();
    };
    (0..count)
        .map_while(|i| {
            let i = i32::try_from(i).ok()?;
            let from = add_months(start, i * step_months)?;
            let to = add_months(start, (i + 1) * step_months)?;
            Some(Period::new(label(granularity, from, to), from, to, granularity))
        })
        .collect()
}

/// Splits a month into Monday-based weeks, clipping the first and last week
/// to the month boundaries.
fn split_into_weeks(month: &Period) -> Vec<Period> {
    let mut weeks = Vec::new();
    let mut from = month.start_date;
    let mut index = 1;
    while from < month.end_date {
        let next_monday = start_of_week(from) + chrono::Duration::days(7);
        let to = next_monday.min(month.end_date);
        let label = format!("{} wk{index}", month.label);
        weeks.push(Period::new(label, from, to, Granularity::Week));
        from = to;
        index += 1;
    }
    weeks
}

/// Splits a month into days 1-15 and 16-end.
fn split_into_halves(month: &Period) -> Vec<Period> {
    let start = month.start_date;
    let Some(mid) = start.with_day(HALF_MONTH_SPLIT_DAY + 1) else {
        return vec![month.clone()];
    };
    let last = days_in_month(start.year(), start.month());
    vec![
        Period::new(
            format!("1-{HALF_MONTH_SPLIT_DAY} {}", month.label),
            start,
            mid,
            Granularity::HalfMonth,
        ),
        Period::new(
            format!("{}-{last} {}", HALF_MONTH_SPLIT_DAY + 1, month.label),
            mid,
            month.end_date,
            Granularity::HalfMonth,
        ),
    ]
}

fn label(granularity: Granularity, from: NaiveDate, to: NaiveDate) -> String {
    match granularity {
        Granularity::Day => from.format("%Y-%m-%d").to_string(),
        Granularity::Week => from.format("%G-W%V").to_string(),
        Granularity::Fortnight | Granularity::HalfMonth => {
            let last = to.pred_opt().unwrap_or(to);
            format!("{} / {}", from.format("%Y-%m-%d"), last.format("%Y-%m-%d"))
        }
        Granularity::Month => from.format("%b %Y").to_string(),
        Granularity::Quarter => format!("Q{} {}", from.month0() / 3 + 1, from.year()),
        Granularity::Semester => format!("S{} {}", from.month0() / 6 + 1, from.year()),
        Granularity::Year => from.year().to_string(),
    }
}
