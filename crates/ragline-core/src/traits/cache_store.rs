use std::time::Duration;

use async_trait::async_trait;

use crate::errors::RagResult;
use crate::models::{CacheEntry, CacheScope};

/// Shared key/value store backing the exact-match cache tier.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> RagResult<Option<String>>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> RagResult<()>;
}

/// Nearest cache entry returned by a semantic store.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    pub entry: CacheEntry,
    /// Cosine similarity between the stored and the probing embedding.
    pub score: f64,
}

/// Vector-indexed store backing the semantic cache tier.
#[async_trait]
pub trait SemanticStore: Send + Sync {
    /// Best match among `candidates` nearest entries inside `scope`.
    async fn nearest(
        &self,
        embedding: &[f32],
        scope: &CacheScope,
        candidates: usize,
    ) -> RagResult<Option<SemanticMatch>>;

    /// Insert or replace the entry stored under `entry.key`.
    async fn upsert(&self, entry: CacheEntry) -> RagResult<()>;
}
