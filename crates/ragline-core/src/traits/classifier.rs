use async_trait::async_trait;

use crate::errors::RagResult;
use crate::models::Industry;

/// Detects the industry vertical a query belongs to.
#[async_trait]
pub trait DomainClassifier: Send + Sync {
    async fn classify(
        &self,
        query: &str,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RagResult<Industry>;
}
