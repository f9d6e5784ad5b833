//! Period calendar: ordered, contiguous `[start, end)` windows for a view.

pub mod calendar;
pub mod dates;
pub mod error;
pub mod types;


pub use calendar::{CalendarView, PeriodCalendar};
pub use error::CalendarError;
pub use types::{Granularity, Period};
