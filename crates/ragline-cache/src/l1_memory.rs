//! L1 in-memory cache using moka.
//!
//! TinyLFU admission, bounded entry count, idle expiry refreshed on read.
//! Fastest tier.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache;
use ragline_core::models::RetrievalResult;

/// L1 in-memory result cache.
///
/// Keys are scoped cache keys. Values are shared result lists.
#[derive(Clone)]
pub struct L1MemoryCache {
    cache: Cache<String, Arc<Vec<RetrievalResult>>>,
}

impl L1MemoryCache {
    /// Create a new L1 cache with the given max entry count and idle TTL.
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_idle(ttl)
            .build();

        Self { cache }
    }

    pub fn get(&self, key: &str) -> Option<Arc<Vec<RetrievalResult>>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, results: Arc<Vec<RetrievalResult>>) {
        self.cache.insert(key, results);
    }

    /// Number of entries currently in the cache.
    pub fn len(&self) -> u64 {
        self.cache.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invalidate all entries.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}
