/// Cache tier failures. Always best-effort: a cache error is a miss on read
/// and a logged warning on write.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache backend failure in {tier}: {reason}")]
    Backend { tier: String, reason: String },

    #[error("cache entry could not be (de)serialized: {reason}")]
    Serialization { reason: String },

    #[error("cache entry {key} is outside the requested scope")]
    ScopeViolation { key: String },

    #[error("cache read from {tier} exceeded {timeout_ms}ms")]
    Timeout { tier: String, timeout_ms: u64 },
}
