//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Result cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Period calendar defaults.
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Cash position configuration.
    #[serde(default)]
    pub position: PositionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Result cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Whether per-entry results are memoized at all.
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// Maximum number of cached results.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// Time-to-live of a cached result, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_max_capacity() -> u64 {
    10_000
}

fn default_ttl_secs() -> u64 {
    300 // 5 minutes
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            max_capacity: default_max_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

/// Period calendar defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    /// Number of top-level units generated when a request omits a horizon.
    #[serde(default = "default_horizon")]
    pub horizon: u32,
}

fn default_horizon() -> u32 {
    12
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            horizon: default_horizon(),
        }
    }
}

/// Cash position configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PositionConfig {
    /// Balance value that upstream forms pre-fill for new accounts. It is not
    /// counted for inactive or unconfigured accounts.
    #[serde(default)]
    pub placeholder_balance: Decimal,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "treso=info,treso_core=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, lowest priority first: `config/default`, `config/{RUN_MODE}`,
    /// then `TRESO__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TRESO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
