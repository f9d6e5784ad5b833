//! Ingestion errors.

use thiserror::Error;

/// A field of an upstream record that could not be mapped onto the canonical
/// shape.
///
/// Ingestion never fails as a whole: the offending field degrades to its safe
/// default and the issue is reported alongside the normalized records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
    /// Amount is missing, non-numeric or not finite.
    #[error("Record {record}: invalid amount in `{field}`")]
    InvalidAmount {
        /// Record identifier.
        record: String,
        /// Offending field.
        field: &'static str,
    },

    /// Date is present but unreadable.
    #[error("Record {record}: invalid date `{value}` in `{field}`")]
    InvalidDate {
        /// Record identifier.
        record: String,
        /// Offending field.
        field: &'static str,
        /// Raw value.
        value: String,
    },

    /// Direction is missing or unrecognized; the record is treated as an
    /// outflow.
    #[error("Record {record}: unknown direction `{value}`, defaulting to outflow")]
    UnknownDirection {
        /// Record identifier.
        record: String,
        /// Raw value.
        value: String,
    },

    /// Frequency is unrecognized; the record contributes nothing.
    #[error("Record {record}: unknown frequency `{value}`")]
    UnknownFrequency {
        /// Record identifier.
        record: String,
        /// Raw value.
        value: String,
    },

    /// A record with no usable link key was dropped.
    #[error("Record {record}: missing `{field}`, record skipped")]
    MissingKey {
        /// Record identifier or position.
        record: String,
        /// Missing field.
        field: &'static str,
    },
}
