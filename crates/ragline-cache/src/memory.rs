//! Process-local L2/L3 backends for single-node deployments and tests.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use ragline_core::errors::RagResult;
use ragline_core::models::{CacheEntry, CacheScope};
use ragline_core::similarity::cosine_similarity;
use ragline_core::traits::{CacheStore, SemanticMatch, SemanticStore};

/// KV store with per-key expiry checked on read.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    entries: DashMap<String, (String, Instant)>,
}

impl InMemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> RagResult<Option<String>> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.1 > Instant::now() => return Ok(Some(entry.0.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> RagResult<()> {
        self.entries
            .insert(key.to_string(), (value, Instant::now() + ttl));
        Ok(())
    }
}

/// Brute-force cosine index over cache entries, upserted by key.
#[derive(Debug, Default)]
pub struct InMemorySemanticStore {
    entries: DashMap<String, CacheEntry>,
}

impl InMemorySemanticStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl SemanticStore for InMemorySemanticStore {
    async fn nearest(
        &self,
        embedding: &[f32],
        scope: &CacheScope,
        candidates: usize,
    ) -> RagResult<Option<SemanticMatch>> {
        let mut scored: Vec<SemanticMatch> = self
            .entries
            .iter()
            .filter(|e| e.scope == *scope)
            .map(|e| SemanticMatch {
                score: cosine_similarity(embedding, &e.embedding),
                entry: e.value().clone(),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(candidates);
        Ok(scored.into_iter().next())
    }

    async fn upsert(&self, entry: CacheEntry) -> RagResult<()> {
        self.entries.insert(entry.key.clone(), entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ragline_core::models::Environment;

    fn entry(key: &str, tenant: &str, embedding: Vec<f32>) -> CacheEntry {
        CacheEntry {
            key: key.to_string(),
            query: key.to_string(),
            embedding,
            results: Vec::new(),
            scope: CacheScope::new(tenant, Environment::Production),
            created_at: Utc::now(),
            ttl_secs: None,
        }
    }

    #[tokio::test]
    async fn kv_entries_expire() {
        let store = InMemoryCacheStore::new();
        store.set("live", "1".into(), Duration::from_secs(60)).await.unwrap();
        store.set("dead", "2".into(), Duration::ZERO).await.unwrap();
        assert_eq!(store.get("live").await.unwrap(), Some("1".to_string()));
        assert_eq!(store.get("dead").await.unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn nearest_respects_scope_and_picks_best() {
        let store = InMemorySemanticStore::new();
        store.upsert(entry("a", "t1", vec![1.0, 0.0])).await.unwrap();
        store.upsert(entry("b", "t1", vec![0.0, 1.0])).await.unwrap();
        store.upsert(entry("c", "t2", vec![1.0, 0.0])).await.unwrap();

        let scope = CacheScope::new("t1", Environment::Production);
        let found = store.nearest(&[0.9, 0.1], &scope, 10).await.unwrap().unwrap();
        assert_eq!(found.entry.key, "a");

        let other = CacheScope::new("t3", Environment::Production);
        assert!(store.nearest(&[1.0, 0.0], &other, 10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_by_key() {
        let store = InMemorySemanticStore::new();
        store.upsert(entry("a", "t1", vec![1.0, 0.0])).await.unwrap();
        store.upsert(entry("a", "t1", vec![0.0, 1.0])).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
