use async_trait::async_trait;

use crate::errors::RagResult;

/// Knowledge-graph context provider.
#[async_trait]
pub trait GraphService: Send + Sync {
    /// A textual summary of the graph neighbourhood of the query, if any.
    async fn context(
        &self,
        query: &str,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RagResult<Option<String>>;
}
