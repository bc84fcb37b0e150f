//! Dense (embedding) branches.
//!
//! The primary branch uses MMR selection and enriches each hit with its
//! document header and, for child chunks, the parent chunk text. The
//! multilingual branch searches an independent embedding space with plain
//! similarity.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ragline_core::errors::RagResult;
use ragline_core::models::{BranchKind, IndexHit, RetrievalResult};
use ragline_core::traits::{DocumentCatalog, DocumentContext, EmbeddingProvider, Selection, VectorStore};
use tracing::{debug, warn};

use super::{BranchQuery, RetrievalBranch};

/// Convert a store hit into a result, carrying its metadata over.
pub(crate) fn hit_to_result(hit: IndexHit, branch: BranchKind, model: &str) -> RetrievalResult {
    let meta = hit.metadata;
    RetrievalResult {
        text: hit.text,
        source: hit.source,
        score: hit.score,
        content_type: "TEXT".to_string(),
        model: model.to_string(),
        branch,
        language: meta.language,
        approx_page: meta.approx_page,
        chunk_type: meta.chunk_type,
        related_assets: meta.related_assets,
        asset_url: meta.asset_url,
        rerank_reason: None,
    }
}

/// `[CONTEXTO: header]` prefix, then `[CONTEXTO PADRE: parent]` wrapper.
pub fn enrich_text(text: &str, header: Option<&str>, parent: Option<&str>) -> String {
    let with_header = match header {
        Some(header) => format!("[CONTEXTO: {header}]\n\n{text}"),
        None => text.to_string(),
    };
    match parent {
        Some(parent) => format!("[CONTEXTO PADRE: {parent}]\n\n---\n\n{with_header}"),
        None => with_header,
    }
}

pub struct DensePrimarySearch {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    catalog: Option<Arc<dyn DocumentCatalog>>,
    fetch_k: usize,
    lambda: f64,
    default_score: f64,
}

impl DensePrimarySearch {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        fetch_k: usize,
        lambda: f64,
        default_score: f64,
    ) -> Self {
        Self {
            embedder,
            store,
            catalog: None,
            fetch_k,
            lambda,
            default_score,
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn DocumentCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Catalog lookups are best-effort: a failure leaves hits unenriched.
    async fn enrichment(
        &self,
        hits: &[IndexHit],
        tenant_ids: &[String],
    ) -> (HashMap<String, DocumentContext>, HashMap<String, String>) {
        let Some(catalog) = &self.catalog else {
            return (HashMap::new(), HashMap::new());
        };

        let mut sources: Vec<String> = hits.iter().map(|h| h.source.clone()).collect();
        sources.sort();
        sources.dedup();
        let parent_ids: Vec<String> = hits
            .iter()
            .filter_map(|h| h.metadata.parent_id.clone())
            .collect();

        let contexts = match catalog.contexts(&sources, tenant_ids).await {
            Ok(contexts) => contexts,
            Err(e) => {
                warn!(error = %e, "document context lookup failed");
                HashMap::new()
            }
        };
        let parents = if parent_ids.is_empty() {
            HashMap::new()
        } else {
            match catalog.parent_texts(&parent_ids).await {
                Ok(parents) => parents,
                Err(e) => {
                    warn!(error = %e, "parent chunk lookup failed");
                    HashMap::new()
                }
            }
        };
        (contexts, parents)
    }
}

#[async_trait]
impl RetrievalBranch for DensePrimarySearch {
    fn kind(&self) -> BranchKind {
        BranchKind::DensePrimary
    }

    async fn try_search(&self, query: &BranchQuery) -> RagResult<Vec<RetrievalResult>> {
        let embedding = self
            .embedder
            .embed(&query.augmented_query, &query.tenant_id, &query.correlation_id)
            .await?;
        let selection = Selection::Mmr {
            fetch_k: self.fetch_k.max(query.limit),
            lambda: self.lambda,
        };
        let hits: Vec<IndexHit> = self
            .store
            .search(&embedding, &query.filter, query.limit, selection)
            .await?
            .into_iter()
            .filter(|h| !h.text.trim().is_empty())
            .collect();
        debug!(hits = hits.len(), "dense primary search complete");

        let (contexts, parents) = self.enrichment(&hits, &query.filter.tenant_ids).await;
        let model = self.embedder.model_id();
        Ok(hits
            .into_iter()
            .map(|hit| {
                let context = contexts.get(&hit.source);
                let header = context.and_then(|c| c.header.as_deref());
                let parent = hit
                    .metadata
                    .parent_id
                    .as_ref()
                    .and_then(|id| parents.get(id))
                    .map(String::as_str);
                let text = enrich_text(&hit.text, header, parent);
                let extra_assets = context.map(|c| c.related_assets.clone()).unwrap_or_default();

                let mut result = hit_to_result(hit, BranchKind::DensePrimary, model);
                result.text = text;
                result.score = Some(result.score.unwrap_or(self.default_score));
                for asset in extra_assets {
                    if !result.related_assets.contains(&asset) {
                        result.related_assets.push(asset);
                    }
                }
                result
            })
            .collect())
    }
}

pub struct DenseMultilingualSearch {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    default_score: f64,
}

impl DenseMultilingualSearch {
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        default_score: f64,
    ) -> Self {
        Self {
            embedder,
            store,
            default_score,
        }
    }
}

#[async_trait]
impl RetrievalBranch for DenseMultilingualSearch {
    fn kind(&self) -> BranchKind {
        BranchKind::DenseMultilingual
    }

    async fn try_search(&self, query: &BranchQuery) -> RagResult<Vec<RetrievalResult>> {
        let embedding = self
            .embedder
            .embed(&query.augmented_query, &query.tenant_id, &query.correlation_id)
            .await?;
        let hits = self
            .store
            .search(&embedding, &query.filter, query.limit, Selection::Similarity)
            .await?;
        debug!(hits = hits.len(), "dense multilingual search complete");

        let model = self.embedder.model_id();
        Ok(hits
            .into_iter()
            .filter(|h| !h.text.trim().is_empty())
            .map(|hit| {
                let mut result = hit_to_result(hit, BranchKind::DenseMultilingual, model);
                result.score = Some(result.score.unwrap_or(self.default_score));
                result
            })
            .collect())
    }
}
