//! 3-tier result cache coordinator.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use ragline_core::config::CacheConfig;
use ragline_core::errors::CacheError;
use ragline_core::models::{CacheEntry, CacheHitTier, CacheScope, RetrievalResult};
use ragline_core::traits::{CacheStore, EmbeddingProvider, SemanticStore};
use ragline_observability::tracing_setup::events;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::key::cache_key;
use crate::{L1MemoryCache, L2KvCache, L3SemanticCache};

/// Orchestrates lookups across all three cache tiers.
///
/// Lookup order: L1 (memory) → L3 (semantic) → L2 (shared KV).
/// Entries never leave their (tenant, environment) scope: L1/L2 keys embed
/// the scope and L3 matches are re-checked against it.
#[derive(Clone)]
pub struct SemanticCache {
    l1: L1MemoryCache,
    l2: Option<L2KvCache>,
    l3: Option<L3SemanticCache>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: CacheConfig,
}

impl SemanticCache {
    /// An L1-only cache. Attach lower tiers with [`with_l2`](Self::with_l2)
    /// and [`with_l3`](Self::with_l3).
    pub fn new(config: CacheConfig, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            l1: L1MemoryCache::new(config.l1_capacity, Duration::from_secs(config.l1_ttl_secs)),
            l2: None,
            l3: None,
            embedder,
            config,
        }
    }

    pub fn with_l2(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.l2 = Some(L2KvCache::new(
            store,
            Duration::from_secs(self.config.l2_ttl_secs),
        ));
        self
    }

    pub fn with_l3(mut self, store: Arc<dyn SemanticStore>) -> Self {
        self.l3 = Some(L3SemanticCache::new(
            store,
            self.config.similarity_threshold,
            self.config.l3_candidates,
        ));
        self
    }

    pub fn key_for(&self, query: &str, scope: &CacheScope) -> String {
        cache_key(&self.config.key_prefix, scope, query)
    }

    /// Look up cached results for `query` within `scope`.
    ///
    /// Tier failures and reads past `lookup_timeout_ms` are logged and
    /// treated as misses. On an L2/L3 hit the
    /// results are promoted to L1.
    pub async fn get(
        &self,
        query: &str,
        scope: &CacheScope,
        correlation_id: &str,
    ) -> (Option<Vec<RetrievalResult>>, CacheHitTier) {
        let key = self.key_for(query, scope);

        if let Some(results) = self.l1.get(&key) {
            events::cache_hit("L1", &key);
            return (Some(results.as_ref().clone()), CacheHitTier::L1);
        }

        if let Some(l3) = &self.l3 {
            let lookup = self.lookup_l3(l3, query, scope, correlation_id);
            match self.within_deadline("L3", lookup).await {
                Ok(Some(results)) => {
                    events::cache_hit("L3", &key);
                    self.l1.insert(key, Arc::new(results.clone()));
                    return (Some(results), CacheHitTier::L3);
                }
                Ok(None) => {}
                Err(e) => warn!(key = %key, error = %e, "L3 lookup failed, treating as miss"),
            }
        }

        if let Some(l2) = &self.l2 {
            match self.within_deadline("L2", l2.get(&key)).await {
                Ok(Some(results)) => {
                    events::cache_hit("L2", &key);
                    self.l1.insert(key, Arc::new(results.clone()));
                    return (Some(results), CacheHitTier::L2);
                }
                Ok(None) => {}
                Err(e) => warn!(key = %key, error = %e, "L2 lookup failed, treating as miss"),
            }
        }

        debug!(key = %key, "cache miss");
        (None, CacheHitTier::Miss)
    }

    /// Bounds a tier read by `lookup_timeout_ms`.
    async fn within_deadline<F>(
        &self,
        tier: &str,
        read: F,
    ) -> Result<Option<Vec<RetrievalResult>>, CacheError>
    where
        F: std::future::Future<Output = Result<Option<Vec<RetrievalResult>>, CacheError>>,
    {
        let deadline = Duration::from_millis(self.config.lookup_timeout_ms);
        tokio::time::timeout(deadline, read)
            .await
            .unwrap_or_else(|_| {
                Err(CacheError::Timeout {
                    tier: tier.to_string(),
                    timeout_ms: self.config.lookup_timeout_ms,
                })
            })
    }

    async fn lookup_l3(
        &self,
        l3: &L3SemanticCache,
        query: &str,
        scope: &CacheScope,
        correlation_id: &str,
    ) -> Result<Option<Vec<RetrievalResult>>, CacheError> {
        let embedding = self
            .embedder
            .embed(query, &scope.tenant_id, correlation_id)
            .await
            .map_err(|e| CacheError::Backend {
                tier: "L3".to_string(),
                reason: e.to_string(),
            })?;
        l3.get(&embedding, scope).await
    }

    /// Store `results` for `query` within `scope`.
    ///
    /// Empty result lists are never cached. L1 is written before returning;
    /// L2 and L3 are written by a detached task whose handle is returned.
    /// Returns `None` when nothing was scheduled.
    pub fn store(
        &self,
        query: &str,
        scope: &CacheScope,
        correlation_id: &str,
        results: &[RetrievalResult],
    ) -> Option<JoinHandle<()>> {
        if results.is_empty() {
            debug!("skipping cache write for empty result set");
            return None;
        }
        let key = self.key_for(query, scope);
        self.l1.insert(key.clone(), Arc::new(results.to_vec()));

        if self.l2.is_none() && self.l3.is_none() {
            return None;
        }
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(key = %key, "no async runtime, skipping L2/L3 write");
                return None;
            }
        };

        let cache = self.clone();
        let query = query.to_string();
        let scope = scope.clone();
        let correlation_id = correlation_id.to_string();
        let results = results.to_vec();
        Some(runtime.spawn(async move {
            cache
                .write_lower_tiers(key, query, scope, correlation_id, results)
                .await;
        }))
    }

    async fn write_lower_tiers(
        &self,
        key: String,
        query: String,
        scope: CacheScope,
        correlation_id: String,
        results: Vec<RetrievalResult>,
    ) {
        if let Some(l2) = &self.l2 {
            if let Err(e) = l2.set(&key, &results).await {
                events::cache_write_failed("L2", &key, &e.to_string());
            }
        }

        if let Some(l3) = &self.l3 {
            let embedding = match self
                .embedder
                .embed(&query, &scope.tenant_id, &correlation_id)
                .await
            {
                Ok(embedding) => embedding,
                Err(e) => {
                    events::cache_write_failed("L3", &key, &e.to_string());
                    return;
                }
            };
            let entry = CacheEntry {
                key: key.clone(),
                query,
                embedding,
                results,
                scope,
                created_at: Utc::now(),
                ttl_secs: None,
            };
            if let Err(e) = l3.put(entry).await {
                events::cache_write_failed("L3", &key, &e.to_string());
            }
        }
    }

    /// Drop every L1 entry. Lower tiers are untouched.
    pub fn clear_l1(&self) {
        self.l1.clear();
    }

    pub fn l1(&self) -> &L1MemoryCache {
        &self.l1
    }
}
