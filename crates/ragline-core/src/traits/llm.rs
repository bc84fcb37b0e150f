use async_trait::async_trait;

use crate::errors::RagResult;

/// Options for a single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: Option<String>,
    pub temperature: f32,
    pub correlation_id: String,
}

/// Text completion collaborator.
#[async_trait]
pub trait LlmCompletion: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        tenant_id: &str,
        options: &GenerationOptions,
    ) -> RagResult<String>;
}
