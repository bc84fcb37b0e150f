//! Full-text (BM25-style) branch. Never touches an embedding provider.

use std::sync::Arc;

use async_trait::async_trait;
use ragline_core::errors::RagResult;
use ragline_core::models::{BranchKind, RetrievalResult};
use ragline_core::traits::KeywordIndex;
use tracing::debug;

use super::{BranchQuery, RetrievalBranch};
use crate::search::dense_search::hit_to_result;

/// Model id stamped on lexical results.
const LEXICAL_MODEL: &str = "keyword";

pub struct LexicalSearch {
    index: Arc<dyn KeywordIndex>,
}

impl LexicalSearch {
    pub fn new(index: Arc<dyn KeywordIndex>) -> Self {
        Self { index }
    }
}

#[async_trait]
impl RetrievalBranch for LexicalSearch {
    fn kind(&self) -> BranchKind {
        BranchKind::Lexical
    }

    async fn try_search(&self, query: &BranchQuery) -> RagResult<Vec<RetrievalResult>> {
        let hits = self
            .index
            .search(&query.query, &query.filter, query.limit)
            .await?;
        debug!(hits = hits.len(), "lexical search complete");
        Ok(hits
            .into_iter()
            .filter(|h| !h.text.trim().is_empty())
            .map(|h| hit_to_result(h, BranchKind::Lexical, LEXICAL_MODEL))
            .collect())
    }
}
