//! Common types used across the application.

pub mod amount;
pub mod id;

pub use amount::{CENT, MAX_AMOUNT, approx_eq, parse_amount, parse_date, round_cents};
pub use id::*;
