//! Scripted, call-counting collaborator fakes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ragline_core::errors::{ExternalServiceError, RagResult, Service};
use ragline_core::models::{HitMetadata, IndexHit, SearchFilter};
use ragline_core::similarity::{cosine_similarity, mmr_select};
use ragline_core::traits::{
    DocumentCatalog, DocumentContext, EmbeddingProvider, GenerationOptions, GraphService,
    KeywordIndex, LlmCompletion, Selection, VectorStore,
};

fn unavailable(service: Service, reason: &str) -> ExternalServiceError {
    ExternalServiceError::Unavailable {
        service,
        reason: reason.to_string(),
    }
}

async fn maybe_sleep(delay: Option<Duration>) {
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

// --- Embeddings ---

/// Embeds texts from a lookup table. Exact matches win, then the longest
/// registered prefix, then the default vector.
pub struct MappedEmbedder {
    model: String,
    vectors: HashMap<String, Vec<f32>>,
    default: Vec<f32>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MappedEmbedder {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            vectors: HashMap::new(),
            default: vec![1.0, 0.0],
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.vectors.insert(text.to_string(), vector);
        self
    }

    pub fn with_default(mut self, vector: Vec<f32>) -> Self {
        self.default = vector;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, text: &str) -> Vec<f32> {
        if let Some(v) = self.vectors.get(text) {
            return v.clone();
        }
        self.vectors
            .iter()
            .filter(|(k, _)| text.starts_with(k.as_str()))
            .max_by_key(|(k, _)| k.len())
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl EmbeddingProvider for MappedEmbedder {
    async fn embed(&self, text: &str, _tenant_id: &str, _correlation_id: &str) -> RagResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        maybe_sleep(self.delay).await;
        Ok(self.lookup(text))
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Always fails.
pub struct FailingEmbedder {
    model: String,
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str, _tenant_id: &str, _correlation_id: &str) -> RagResult<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(unavailable(Service::Embedding, "embedding endpoint down").into())
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// --- Completion ---

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
    Slow(Duration, String),
}

/// Answers prompts by the first rule whose needle the prompt contains.
pub struct ScriptedLlm {
    rules: Vec<(String, Reply)>,
    fallback: Reply,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl Default for ScriptedLlm {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedLlm {
    /// Fails every prompt until rules are added.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Reply::Fail("no scripted reply".to_string()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn reply_when(mut self, needle: &str, text: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Text(text.to_string())));
        self
    }

    pub fn fail_when(mut self, needle: &str, reason: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Fail(reason.to_string())));
        self
    }

    pub fn slow_when(mut self, needle: &str, delay: Duration, text: &str) -> Self {
        self.rules
            .push((needle.to_string(), Reply::Slow(delay, text.to_string())));
        self
    }

    pub fn otherwise(mut self, text: &str) -> Self {
        self.fallback = Reply::Text(text.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// Number of prompts received that contain `needle`.
    pub fn calls_containing(&self, needle: &str) -> usize {
        self.prompts().iter().filter(|p| p.contains(needle)).count()
    }
}

#[async_trait]
impl LlmCompletion for ScriptedLlm {
    async fn generate(
        &self,
        prompt: &str,
        _tenant_id: &str,
        _options: &GenerationOptions,
    ) -> RagResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let reply = self
            .rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| self.fallback.clone());
        match reply {
            Reply::Text(text) => Ok(text),
            Reply::Fail(reason) => Err(ExternalServiceError::CallFailed {
                service: Service::Llm,
                reason,
            }
            .into()),
            Reply::Slow(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }
}

// --- Stores ---

/// A chunk held by the in-memory vector store and keyword index.
#[derive(Debug, Clone)]
pub struct StoredChunk {
    pub id: String,
    pub text: String,
    pub source: String,
    pub embedding: Vec<f32>,
    pub metadata: HitMetadata,
}

impl StoredChunk {
    pub fn new(id: &str, text: &str, source: &str, tenant_id: &str) -> Self {
        Self {
            id: id.to_string(),
            text: text.to_string(),
            source: source.to_string(),
            embedding: vec![1.0, 0.0],
            metadata: HitMetadata {
                tenant_id: tenant_id.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    pub fn with_metadata(mut self, metadata: HitMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    fn hit(&self, score: Option<f64>) -> IndexHit {
        IndexHit {
            id: self.id.clone(),
            text: self.text.clone(),
            source: self.source.clone(),
            score,
            metadata: self.metadata.clone(),
        }
    }
}

/// Brute-force vector store honouring the filter and the selection mode.
pub struct InMemoryVectorStore {
    chunks: Vec<StoredChunk>,
    omit_scores: bool,
    delay: Option<Duration>,
    fail: bool,
    calls: AtomicUsize,
    selections: Mutex<Vec<Selection>>,
}

impl InMemoryVectorStore {
    pub fn new(chunks: Vec<StoredChunk>) -> Self {
        Self {
            chunks,
            omit_scores: false,
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
            selections: Mutex::new(Vec::new()),
        }
    }

    /// Return hits without a score.
    pub fn without_scores(mut self) -> Self {
        self.omit_scores = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn selections(&self) -> Vec<Selection> {
        self.selections.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn search(
        &self,
        embedding: &[f32],
        filter: &SearchFilter,
        k: usize,
        selection: Selection,
    ) -> RagResult<Vec<IndexHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut selections) = self.selections.lock() {
            selections.push(selection);
        }
        maybe_sleep(self.delay).await;
        if self.fail {
            return Err(unavailable(Service::VectorStore, "vector index offline").into());
        }

        let mut scored: Vec<(&StoredChunk, f64)> = self
            .chunks
            .iter()
            .filter(|c| filter.matches(&c.source, &c.metadata))
            .map(|c| (c, cosine_similarity(embedding, &c.embedding)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let picked: Vec<(&StoredChunk, f64)> = match selection {
            Selection::Similarity => scored.into_iter().take(k).collect(),
            Selection::Mmr { fetch_k, lambda } => {
                let pool: Vec<(&StoredChunk, f64)> = scored.into_iter().take(fetch_k).collect();
                let vectors: Vec<Vec<f32>> = pool.iter().map(|(c, _)| c.embedding.clone()).collect();
                mmr_select(embedding, &vectors, k, lambda)
                    .into_iter()
                    .map(|i| pool[i])
                    .collect()
            }
        };

        Ok(picked
            .into_iter()
            .map(|(c, score)| c.hit(if self.omit_scores { None } else { Some(score) }))
            .collect())
    }
}

/// Term-overlap keyword index honouring the filter.
pub struct InMemoryKeywordIndex {
    chunks: Vec<StoredChunk>,
    delay: Option<Duration>,
    fail: bool,
    calls: AtomicUsize,
}

impl InMemoryKeywordIndex {
    pub fn new(chunks: Vec<StoredChunk>) -> Self {
        Self {
            chunks,
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeywordIndex for InMemoryKeywordIndex {
    async fn search(&self, query: &str, filter: &SearchFilter, k: usize) -> RagResult<Vec<IndexHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        maybe_sleep(self.delay).await;
        if self.fail {
            return Err(unavailable(Service::KeywordIndex, "full-text index offline").into());
        }

        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let mut scored: Vec<(&StoredChunk, usize)> = self
            .chunks
            .iter()
            .filter(|c| filter.matches(&c.source, &c.metadata))
            .map(|c| {
                let text = c.text.to_lowercase();
                (c, terms.iter().filter(|t| text.contains(t.as_str())).count())
            })
            .filter(|(_, hits)| *hits > 0)
            .collect();
        // Stable: equal scores keep insertion order.
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(c, hits)| c.hit(Some(hits as f64)))
            .collect())
    }
}

/// Returns a fixed graph summary.
pub struct StaticGraph {
    summary: Option<String>,
    delay: Option<Duration>,
    fail: bool,
    calls: AtomicUsize,
}

impl StaticGraph {
    pub fn new(summary: Option<&str>) -> Self {
        Self {
            summary: summary.map(str::to_string),
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GraphService for StaticGraph {
    async fn context(&self, _query: &str, _tenant_id: &str, _correlation_id: &str) -> RagResult<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        maybe_sleep(self.delay).await;
        if self.fail {
            return Err(unavailable(Service::Graph, "graph database offline").into());
        }
        Ok(self.summary.clone())
    }
}

/// Fixed document contexts and parent texts.
#[derive(Default)]
pub struct StaticCatalog {
    contexts: HashMap<String, DocumentContext>,
    parents: HashMap<String, String>,
    fail: bool,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(mut self, source: &str, context: DocumentContext) -> Self {
        self.contexts.insert(source.to_string(), context);
        self
    }

    pub fn with_parent(mut self, parent_id: &str, text: &str) -> Self {
        self.parents.insert(parent_id.to_string(), text.to_string());
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl DocumentCatalog for StaticCatalog {
    async fn contexts(
        &self,
        sources: &[String],
        _tenant_ids: &[String],
    ) -> RagResult<HashMap<String, DocumentContext>> {
        if self.fail {
            return Err(unavailable(Service::DocumentCatalog, "catalog offline").into());
        }
        Ok(sources
            .iter()
            .filter_map(|s| self.contexts.get(s).map(|c| (s.clone(), c.clone())))
            .collect())
    }

    async fn parent_texts(&self, parent_ids: &[String]) -> RagResult<HashMap<String, String>> {
        if self.fail {
            return Err(unavailable(Service::DocumentCatalog, "catalog offline").into());
        }
        Ok(parent_ids
            .iter()
            .filter_map(|id| self.parents.get(id).map(|t| (id.clone(), t.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ragline_core::models::{Environment, Industry};

    fn filter(tenant: &str) -> SearchFilter {
        SearchFilter::new(tenant, &[], Environment::Production, &Industry::generic())
    }

    #[tokio::test]
    async fn embedder_prefers_exact_then_prefix() {
        let e = MappedEmbedder::new("m")
            .with_vector("freno", vec![0.0, 1.0])
            .with_vector("freno de seguridad", vec![1.0, 1.0]);
        assert_eq!(e.embed("freno de seguridad", "t", "c").await.unwrap(), vec![1.0, 1.0]);
        assert_eq!(e.embed("freno de seguridad\n\n[HYDE]: x", "t", "c").await.unwrap(), vec![1.0, 1.0]);
        assert_eq!(e.embed("freno x", "t", "c").await.unwrap(), vec![0.0, 1.0]);
        assert_eq!(e.embed("other", "t", "c").await.unwrap(), vec![1.0, 0.0]);
        assert_eq!(e.calls(), 4);
    }

    #[tokio::test]
    async fn scripted_llm_matches_rules_in_order() {
        let llm = ScriptedLlm::new()
            .reply_when("alpha", "A")
            .fail_when("beta", "boom")
            .otherwise("Z");
        let opts = GenerationOptions {
            model: None,
            temperature: 0.0,
            correlation_id: "c".to_string(),
        };
        assert_eq!(llm.generate("has alpha", "t", &opts).await.unwrap(), "A");
        assert!(llm.generate("has beta", "t", &opts).await.is_err());
        assert_eq!(llm.generate("none", "t", &opts).await.unwrap(), "Z");
        assert_eq!(llm.calls_containing("has"), 2);
    }

    #[tokio::test]
    async fn keyword_index_scopes_and_ranks() {
        let index = InMemoryKeywordIndex::new(vec![
            StoredChunk::new("1", "freno", "a", "t1"),
            StoredChunk::new("2", "freno de seguridad", "b", "t1"),
            StoredChunk::new("3", "freno de seguridad", "c", "t2"),
        ]);
        let hits = index.search("freno seguridad", &filter("t1"), 10).await.unwrap();
        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1"]);
    }
}
