use async_trait::async_trait;

use crate::errors::RagResult;

/// Embedding generation provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text on behalf of a tenant.
    async fn embed(&self, text: &str, tenant_id: &str, correlation_id: &str)
        -> RagResult<Vec<f32>>;

    /// Identifier stamped on results produced from this embedding space.
    fn model_id(&self) -> &str;
}
