//! Completion-model fallback for domain detection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ragline_core::config::DomainConfig;
use ragline_core::constants::KNOWN_INDUSTRIES;
use ragline_core::errors::{RagError, RagResult};
use ragline_core::models::Industry;
use ragline_core::traits::{DomainClassifier, GenerationOptions, LlmCompletion};
use tracing::{debug, warn};

use crate::prompts;

/// Map a model answer onto a known label. Anything else is `GENERIC`.
pub fn parse_label(response: &str) -> Industry {
    let label = response
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '_')
        .to_uppercase();
    if KNOWN_INDUSTRIES.contains(&label.as_str()) {
        Industry::new(label)
    } else {
        Industry::generic()
    }
}

/// Asks the completion model to choose one of the known verticals.
pub struct LlmDomainClassifier {
    llm: Arc<dyn LlmCompletion>,
    retries: u32,
    timeout: Duration,
}

impl LlmDomainClassifier {
    pub fn new(llm: Arc<dyn LlmCompletion>, retries: u32, timeout: Duration) -> Self {
        Self {
            llm,
            retries,
            timeout,
        }
    }

    pub fn from_config(llm: Arc<dyn LlmCompletion>, config: &DomainConfig) -> Self {
        Self::new(
            llm,
            config.llm_retries,
            Duration::from_millis(config.llm_timeout_ms),
        )
    }
}

#[async_trait]
impl DomainClassifier for LlmDomainClassifier {
    /// Makes `1 + retries` attempts, each under the configured deadline.
    async fn classify(
        &self,
        query: &str,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RagResult<Industry> {
        let prompt = prompts::domain(query, KNOWN_INDUSTRIES);
        let options = GenerationOptions {
            model: None,
            temperature: 0.0,
            correlation_id: correlation_id.to_string(),
        };

        let mut attempt = 0;
        loop {
            let call = self.llm.generate(&prompt, tenant_id, &options);
            let result = match tokio::time::timeout(self.timeout, call).await {
                Ok(result) => result,
                Err(_) => Err(RagError::timeout("domain classification", self.timeout)),
            };
            match result {
                Ok(response) => {
                    let industry = parse_label(&response);
                    debug!(industry = %industry, attempt, "domain detected by model");
                    return Ok(industry);
                }
                Err(e) if attempt < self.retries => {
                    warn!(error = %e, attempt, "domain classification failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
