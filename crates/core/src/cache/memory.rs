//! In-memory result cache backed by Moka.

use std::time::Duration;

use moka::sync::Cache;
use rust_decimal::Decimal;

use super::{CacheKey, ResultCache};

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Size-capped, time-expired result cache.
///
/// Values older than the TTL are never returned. Past the capacity, Moka
/// evicts the least recently used values. Thread-safe.
#[derive(Clone)]
pub struct MokaResultCache {
    cache: Cache<CacheKey, Decimal>,
}

impl MokaResultCache {
    /// Creates a cache with default settings.
    ///
    /// Default: 10 000 entries max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries to cache
    /// * `ttl_secs` - Time-to-live in seconds for each entry
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending eviction and expiry work.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for MokaResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache for MokaResultCache {
    fn get(&self, key: &CacheKey) -> Option<Decimal> {
        self.cache.get(key)
    }

    fn put(&self, key: CacheKey, value: Decimal) {
        self.cache.insert(key, value);
    }

    fn evict(&self, key: &CacheKey) {
        self.cache.invalidate(key);
    }

    fn clear(&self) {
        self.cache.invalidate_all();
    }
}
