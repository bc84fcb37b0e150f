use async_trait::async_trait;

use crate::errors::RagResult;
use crate::models::{IndexHit, SearchFilter};

/// Full-text ranked search (BM25-style).
#[async_trait]
pub trait KeywordIndex: Send + Sync {
    async fn search(&self, query: &str, filter: &SearchFilter, k: usize)
        -> RagResult<Vec<IndexHit>>;
}
