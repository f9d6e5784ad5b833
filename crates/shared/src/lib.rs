//! Shared types, errors, and configuration for Treso.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Decimal amount and date parsing helpers for the ingestion boundary
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CacheConfig, CalendarConfig, LoggingConfig, PositionConfig};
pub use error::{AppError, AppResult};
