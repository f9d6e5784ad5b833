//! Calendar error types.

use thiserror::Error;

/// Calendar-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    /// The view name is not recognized.
    #[error("Unknown calendar view: {0}")]
    UnknownView(String),

    /// Multi-year views only exist for 3, 5 and 7 years.
    #[error("Unsupported multi-year horizon: {0} years")]
    UnsupportedYears(u32),
}
