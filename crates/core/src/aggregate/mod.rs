//! Aggregation of per-entry amounts by category and side.

pub mod filter;
pub mod service;
pub mod types;
pub mod variance;


pub use filter::VisibilityFilter;
pub use service::Aggregator;
pub use types::{CategoryTotals, GeneralTotals, Totals};
pub use variance::{Variance, VarianceStatus};
