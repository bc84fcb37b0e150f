//! Retrieval branches, their concurrent scheduler, and rank fusion.

mod dense_search;
mod graph_search;
mod lexical_search;
pub mod rrf_fusion;
pub(crate) mod scheduler;

use async_trait::async_trait;
use ragline_core::errors::RagResult;
use ragline_core::models::{BranchKind, Environment, Industry, RetrievalResult, SearchFilter};
use tracing::warn;

pub use dense_search::{DenseMultilingualSearch, DensePrimarySearch};
pub use graph_search::GraphContextSearch;
pub use lexical_search::LexicalSearch;
pub use rrf_fusion::{RankFusionEngine, RankedList};
pub use scheduler::BranchScheduler;

/// Everything a branch needs to run one search.
#[derive(Debug, Clone)]
pub struct BranchQuery {
    /// The caller's query. Used by lexical and graph branches.
    pub query: String,
    /// The HyDE-augmented query (equal to `query` when augmentation is off
    /// or failed). Used by dense branches.
    pub augmented_query: String,
    pub tenant_id: String,
    pub correlation_id: String,
    /// Candidates to fetch.
    pub limit: usize,
    pub industry: Industry,
    pub environment: Environment,
    pub filter: SearchFilter,
}

impl BranchQuery {
    /// A copy searching `text` for both the plain and augmented query.
    pub fn with_text(&self, text: &str, limit: usize) -> Self {
        Self {
            query: text.to_string(),
            augmented_query: text.to_string(),
            limit,
            ..self.clone()
        }
    }
}

/// One independent retrieval strategy.
#[async_trait]
pub trait RetrievalBranch: Send + Sync {
    fn kind(&self) -> BranchKind;

    /// Run the search, surfacing collaborator failures.
    async fn try_search(&self, query: &BranchQuery) -> RagResult<Vec<RetrievalResult>>;

    /// Run the search. Never fails: errors are logged and yield no results.
    async fn search(&self, query: &BranchQuery) -> Vec<RetrievalResult> {
        match self.try_search(query).await {
            Ok(results) => results,
            Err(e) => {
                warn!(branch = %self.kind(), error = %e, "branch failed, contributing nothing");
                Vec::new()
            }
        }
    }
}
