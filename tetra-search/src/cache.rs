//! In-memory TTL cache for aggregated search responses.
//!
//! Caches the final scored, sorted result list keyed by the normalised
//! (trimmed, lowercased) query. Expiry is lazy: a stale entry is removed
//! when it is read, and every write that pushes the map above its capacity
//! sweeps out all expired entries. There is no LRU eviction, so a burst of
//! fresh distinct queries can hold the map above capacity until they age out.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::types::CacheEntry;

/// Normalise a query into its cache key.
///
/// Read and write paths must agree, so `"  Rust "` and `"rust"` share an entry.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Process-wide result cache, shared with the aggregator behind an [`Arc`].
#[derive(Debug)]
pub struct ResultCache {
    entries: Mutex<HashMap<String, Arc<CacheEntry>>>,
    ttl_millis: i64,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl ResultCache {
    /// Create a cache backed by the system clock.
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an injected clock.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let ttl_millis = i64::try_from(config.ttl_seconds.saturating_mul(1_000)).unwrap_or(i64::MAX);
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl_millis,
            capacity: config.capacity,
            clock,
        }
    }

    /// Current time according to this cache's clock.
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Look up the entry for `query`.
    ///
    /// Returns `None` on a miss. An entry older than the TTL is removed and
    /// also reported as a miss.
    pub fn get(&self, query: &str) -> Option<Arc<CacheEntry>> {
        let key = normalize_query(query);
        let now = self.now_millis();
        let mut entries = self.lock();

        let entry = entries.get(&key)?;
        if self.is_expired(entry, now) {
            entries.remove(&key);
            tracing::trace!(query = %key, "evicted stale cache entry on read");
            return None;
        }
        Some(Arc::clone(entry))
    }

    /// Store `entry` under `query`, replacing any existing entry.
    ///
    /// When the entry count exceeds the configured capacity, every expired
    /// entry is swept.
    pub fn put(&self, query: &str, entry: CacheEntry) {
        let key = normalize_query(query);
        let now = self.now_millis();
        let mut entries = self.lock();

        entries.insert(key, Arc::new(entry));

        if entries.len() > self.capacity {
            let before = entries.len();
            entries.retain(|_, entry| !self.is_expired(entry, now));
            tracing::debug!(
                removed = before - entries.len(),
                remaining = entries.len(),
                "swept expired cache entries"
            );
        }
    }

    /// Number of entries currently held, fresh or stale.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn is_expired(&self, entry: &CacheEntry, now: i64) -> bool {
        now.saturating_sub(entry.timestamp) > self.ttl_millis
    }

    // A panic while holding the lock cannot leave the map half-written, so
    // a poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<CacheEntry>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
