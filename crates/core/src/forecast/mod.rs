//! Forecast pipeline: from raw upstream records to period positions.

pub mod engine;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::{EngineSettings, ForecastEngine};
pub use types::{EntryRow, ForecastReport, ForecastRequest, PeriodReport};
