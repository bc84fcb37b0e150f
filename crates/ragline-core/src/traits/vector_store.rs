use async_trait::async_trait;

use crate::errors::RagResult;
use crate::models::{IndexHit, SearchFilter};

/// How a vector store picks its `k` hits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// Plain nearest neighbours.
    Similarity,
    /// Maximal marginal relevance over a `fetch_k` candidate pool.
    Mmr { fetch_k: usize, lambda: f64 },
}

/// Nearest-neighbour search over one embedding space.
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn search(
        &self,
        embedding: &[f32],
        filter: &SearchFilter,
        k: usize,
        selection: Selection,
    ) -> RagResult<Vec<IndexHit>>;
}
