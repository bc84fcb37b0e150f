//! L3 semantic tier: nearest cached query by embedding similarity.

use std::sync::Arc;

use ragline_core::errors::CacheError;
use ragline_core::models::{CacheEntry, CacheScope, RetrievalResult};
use ragline_core::traits::SemanticStore;
use tracing::debug;

/// L3 tier. A match is accepted only when its similarity strictly exceeds
/// the threshold and its stored scope equals the probing scope.
#[derive(Clone)]
pub struct L3SemanticCache {
    store: Arc<dyn SemanticStore>,
    threshold: f64,
    candidates: usize,
}

impl L3SemanticCache {
    pub fn new(store: Arc<dyn SemanticStore>, threshold: f64, candidates: usize) -> Self {
        Self {
            store,
            threshold,
            candidates,
        }
    }

    pub async fn get(
        &self,
        embedding: &[f32],
        scope: &CacheScope,
    ) -> Result<Option<Vec<RetrievalResult>>, CacheError> {
        let found = self
            .store
            .nearest(embedding, scope, self.candidates)
            .await
            .map_err(|e| CacheError::Backend {
                tier: "L3".to_string(),
                reason: e.to_string(),
            })?;

        let Some(found) = found else {
            return Ok(None);
        };
        if found.entry.scope != *scope {
            return Err(CacheError::ScopeViolation {
                key: found.entry.key,
            });
        }
        if found.score <= self.threshold {
            debug!(score = found.score, threshold = self.threshold, "L3 match below threshold");
            return Ok(None);
        }
        Ok(Some(found.entry.results))
    }

    pub async fn put(&self, entry: CacheEntry) -> Result<(), CacheError> {
        self.store.upsert(entry).await.map_err(|e| CacheError::Backend {
            tier: "L3".to_string(),
            reason: e.to_string(),
        })
    }
}
