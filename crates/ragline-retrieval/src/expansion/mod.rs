//! Query augmentation: HyDE and paraphrase expansion.
//!
//! Both steps are fail-open. The `try_*` methods return the error, the plain
//! methods apply the documented fallback.

mod hyde;
mod paraphrase;

use std::sync::Arc;
use std::time::Duration;

use ragline_core::config::AugmentationConfig;
use ragline_core::errors::{RagError, RagResult};
use ragline_core::traits::{GenerationOptions, LlmCompletion};

pub use hyde::augment_with_answer;
pub use paraphrase::parse_variations;

/// Generates HyDE-augmented queries and paraphrased variations.
pub struct QueryAugmenter {
    llm: Arc<dyn LlmCompletion>,
    config: AugmentationConfig,
}

impl QueryAugmenter {
    pub fn new(llm: Arc<dyn LlmCompletion>, config: AugmentationConfig) -> Self {
        Self { llm, config }
    }

    pub fn config(&self) -> &AugmentationConfig {
        &self.config
    }

    async fn complete(
        &self,
        operation: &str,
        prompt: &str,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RagResult<String> {
        let options = GenerationOptions {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            correlation_id: correlation_id.to_string(),
        };
        let deadline = Duration::from_millis(self.config.call_timeout_ms);
        tokio::time::timeout(deadline, self.llm.generate(prompt, tenant_id, &options))
            .await
            .map_err(|_| RagError::timeout(operation, deadline))?
    }
}
