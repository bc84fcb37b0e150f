//! L2 exact-key tier over a shared KV store, with explicit TTL.

use std::sync::Arc;
use std::time::Duration;

use ragline_core::errors::CacheError;
use ragline_core::models::RetrievalResult;
use ragline_core::traits::CacheStore;

/// L2 exact-match tier. Values are JSON-encoded result lists.
#[derive(Clone)]
pub struct L2KvCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl L2KvCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Vec<RetrievalResult>>, CacheError> {
        let raw = self.store.get(key).await.map_err(|e| CacheError::Backend {
            tier: "L2".to_string(),
            reason: e.to_string(),
        })?;
        raw.map(|value| {
            serde_json::from_str(&value).map_err(|e| CacheError::Serialization {
                reason: e.to_string(),
            })
        })
        .transpose()
    }

    pub async fn set(&self, key: &str, results: &[RetrievalResult]) -> Result<(), CacheError> {
        let value = serde_json::to_string(results).map_err(|e| CacheError::Serialization {
            reason: e.to_string(),
        })?;
        self.store
            .set(key, value, self.ttl)
            .await
            .map_err(|e| CacheError::Backend {
                tier: "L2".to_string(),
                reason: e.to_string(),
            })
    }
}
