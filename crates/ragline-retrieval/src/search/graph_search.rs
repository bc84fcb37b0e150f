//! Knowledge-graph branch: at most one opaque summary.

use std::sync::Arc;

use async_trait::async_trait;
use ragline_core::constants::{GRAPH_CONTENT_TYPE, GRAPH_MODEL, GRAPH_SOURCE};
use ragline_core::errors::RagResult;
use ragline_core::models::{BranchKind, RetrievalResult};
use ragline_core::traits::GraphService;

use super::{BranchQuery, RetrievalBranch};

pub struct GraphContextSearch {
    graph: Arc<dyn GraphService>,
}

impl GraphContextSearch {
    pub fn new(graph: Arc<dyn GraphService>) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl RetrievalBranch for GraphContextSearch {
    fn kind(&self) -> BranchKind {
        BranchKind::GraphContext
    }

    async fn try_search(&self, query: &BranchQuery) -> RagResult<Vec<RetrievalResult>> {
        let summary = self
            .graph
            .context(&query.query, &query.tenant_id, &query.correlation_id)
            .await?;
        // No summary is not an error.
        Ok(summary
            .filter(|s| !s.trim().is_empty())
            .map(|s| {
                RetrievalResult::new(s, GRAPH_SOURCE, BranchKind::GraphContext)
                    .with_score(1.0)
                    .with_content_type(GRAPH_CONTENT_TYPE)
                    .with_model(GRAPH_MODEL)
            })
            .into_iter()
            .collect())
    }
}
