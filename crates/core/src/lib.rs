//! Core computation for Treso.
//!
//! This crate contains pure forecasting logic with ZERO I/O.
//! Every public operation is a function of its inputs; malformed input
//! degrades to a zero contribution instead of an error.
//!
//! # Modules
//!
//! - `period` - Period calendar generation for every view
//! - `entry` - Canonical budget entries and ingestion of upstream records
//! - `frequency` - Budgeted amount of an entry inside a period
//! - `expansion` - VAT split and synthetic VAT/tax payment entries
//! - `reconcile` - Realized amount of an entry inside a period
//! - `aggregate` - Category and general totals, variance, visibility
//! - `position` - Cash position propagation
//! - `cache` - Memoization of per-entry results
//! - `forecast` - End-to-end pipeline

pub mod aggregate;
pub mod cache;
pub mod entry;
pub mod expansion;
pub mod forecast;
pub mod frequency;
pub mod period;
pub mod position;
pub mod reconcile;

pub use forecast::{ForecastEngine, ForecastReport, ForecastRequest};
