//! Expansion error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a synthetic-entry generation step is abandoned.
///
/// These never reach callers of `EntryExpander::expand`: a failed step
/// produces no synthetic entries and the base entries pass through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpansionError {
    /// VAT regime type is not recognized.
    #[error("VAT regime `{0}` has an unknown regime type")]
    UnknownRegime(String),

    /// Tax declaration periodicity is not recognized.
    #[error("Tax `{0}` has an unknown declaration periodicity")]
    UnknownPeriodicity(String),

    /// Tax rate is negative.
    #[error("Tax `{tax_type}` has a negative rate {rate}")]
    NegativeRate {
        /// Tax type.
        tax_type: String,
        /// Configured rate.
        rate: Decimal,
    },

    /// A balance or tax amount falls outside `Decimal`'s range.
    #[error("Amount overflow while computing `{0}`")]
    AmountOverflow(String),

    /// Payment delay pushes the due date outside the supported range.
    #[error("Due date out of range for the window starting {0}")]
    DueDateOutOfRange(NaiveDate),
}
