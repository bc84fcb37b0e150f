use std::collections::HashMap;

use async_trait::async_trait;

use crate::errors::RagResult;
use crate::models::RelatedAsset;

/// Document-level context attached to every chunk of a source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentContext {
    pub header: Option<String>,
    pub related_assets: Vec<RelatedAsset>,
}

/// Document metadata used to enrich dense hits.
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    /// Context for each source, keyed by source id. Missing sources are omitted.
    async fn contexts(
        &self,
        sources: &[String],
        tenant_ids: &[String],
    ) -> RagResult<HashMap<String, DocumentContext>>;

    /// Parent chunk text for each id, keyed by parent id.
    async fn parent_texts(&self, parent_ids: &[String]) -> RagResult<HashMap<String, String>>;
}
