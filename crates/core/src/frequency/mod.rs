//! Frequency resolution: budgeted amount of an entry inside a period.

pub mod resolver;
pub mod schedule;


pub use resolver::{AmountPolicy, FrequencyResolver};
pub use schedule::{MAX_OCCURRENCES, Schedule};
