use serde::{Deserialize, Serialize};

use super::defaults;

/// Semantic cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Max entries held in the in-process tier.
    pub l1_capacity: u64,
    pub l1_ttl_secs: u64,
    pub l2_ttl_secs: u64,
    /// Cosine similarity an L3 match must strictly exceed.
    pub similarity_threshold: f64,
    /// Candidates the L3 store considers per lookup.
    pub l3_candidates: usize,
    pub key_prefix: String,
    /// Deadline for each L2/L3 read. An elapsed read is a miss.
    pub lookup_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_CACHE_ENABLED,
            l1_capacity: defaults::DEFAULT_L1_CAPACITY,
            l1_ttl_secs: defaults::DEFAULT_L1_TTL_SECS,
            l2_ttl_secs: defaults::DEFAULT_L2_TTL_SECS,
            similarity_threshold: defaults::DEFAULT_SIMILARITY_THRESHOLD,
            l3_candidates: defaults::DEFAULT_L3_CANDIDATES,
            key_prefix: defaults::DEFAULT_CACHE_KEY_PREFIX.to_string(),
            lookup_timeout_ms: defaults::DEFAULT_CACHE_LOOKUP_TIMEOUT_MS,
        }
    }
}
