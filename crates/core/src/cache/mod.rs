//! Memoization of per-entry, per-period results.
//!
//! A cached value must equal what recomputation would return. Keys carry a
//! fingerprint of every input the value depends on (entry contents, actual
//! sources), so entries rebuilt under the same IDs never hit stale values.

pub mod memory;

use std::hash::{DefaultHasher, Hash, Hasher};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;
use treso_shared::types::EntryId;

use crate::frequency::AmountPolicy;

pub use memory::MokaResultCache;

/// Computation a cached value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum OperationKind {
    /// Budgeted amount under a policy.
    Budget {
        /// Policy used.
        policy: AmountPolicy,
    },
    /// Realized amount.
    Actual,
    /// Prorated VAT.
    VatDue,
}

/// Cache key: one operation on one entry over one period.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Operation.
    pub kind: OperationKind,
    /// Entry identity.
    pub entry_id: EntryId,
    /// Period start, inclusive.
    pub period_start: NaiveDate,
    /// Period end, exclusive.
    pub period_end: NaiveDate,
    /// Hash of the inputs the value is computed from.
    pub fingerprint: u64,
}

impl CacheKey {
    /// Creates a key.
    #[must_use]
    pub fn new(
        kind: OperationKind,
        entry_id: EntryId,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Self {
        Self {
            kind,
            entry_id,
            period_start,
            period_end,
            fingerprint: 0,
        }
    }

    /// Sets the input fingerprint.
    #[must_use]
    pub fn with_fingerprint(mut self, fingerprint: u64) -> Self {
        self.fingerprint = fingerprint;
        self
    }
}

/// Hash of a computation input, for [`CacheKey::fingerprint`].
#[must_use]
pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Bounded store of computed amounts.
///
/// Implementations may drop any value at any time (size cap, expiry); a miss
/// only means recomputation.
pub trait ResultCache: Send + Sync {
    /// Returns a live cached value.
    fn get(&self, key: &CacheKey) -> Option<Decimal>;

    /// Stores a value.
    fn put(&self, key: CacheKey, value: Decimal);

    /// Drops one value.
    fn evict(&self, key: &CacheKey);

    /// Drops every value.
    fn clear(&self);
}

/// Returns the cached value for `key`, computing and storing it on a miss.
pub fn cached(cache: &dyn ResultCache, key: CacheKey, compute: impl FnOnce() -> Decimal) -> Decimal {
    if let Some(hit) = cache.get(&key) {
        trace!(entry = %key.entry_id, kind = ?key.kind, "Cache hit");
        return hit;
    }
    let value = compute();
    cache.put(key, value);
    value
}

/// Cache that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl ResultCache for NoopCache {
    fn get(&self, _key: &CacheKey) -> Option<Decimal> {
        None
    }

    fn put(&self, _key: CacheKey, _value: Decimal) {}

    fn evict(&self, _key: &CacheKey) {}

    fn clear(&self) {}
}
