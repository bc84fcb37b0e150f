//! Industry vertical detection for domain refinement.
//!
//! A word-boundary keyword heuristic answers first. When it finds nothing,
//! the completion model is asked to pick a label.

mod keyword;
mod llm;

use std::sync::Arc;

use async_trait::async_trait;
use ragline_core::config::DomainConfig;
use ragline_core::errors::RagResult;
use ragline_core::models::Industry;
use ragline_core::traits::{DomainClassifier, LlmCompletion};
use tracing::debug;

pub use keyword::KeywordDomainClassifier;
pub use llm::{parse_label, LlmDomainClassifier};

/// Keyword heuristic first, then an optional LLM fallback.
pub struct HeuristicThenLlmClassifier {
    keywords: KeywordDomainClassifier,
    fallback: Option<LlmDomainClassifier>,
}

impl HeuristicThenLlmClassifier {
    pub fn new(keywords: KeywordDomainClassifier, fallback: Option<LlmDomainClassifier>) -> Self {
        Self { keywords, fallback }
    }

    /// Built-in keyword tables, with the LLM fallback when `config` enables it.
    pub fn from_config(llm: Arc<dyn LlmCompletion>, config: &DomainConfig) -> Self {
        let fallback = config
            .llm_fallback
            .then(|| LlmDomainClassifier::from_config(llm, config));
        Self::new(KeywordDomainClassifier::new(), fallback)
    }
}

#[async_trait]
impl DomainClassifier for HeuristicThenLlmClassifier {
    async fn classify(
        &self,
        query: &str,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RagResult<Industry> {
        if let Some(industry) = self.keywords.detect(query) {
            debug!(industry = %industry, "domain detected by keywords");
            return Ok(industry);
        }
        match &self.fallback {
            Some(llm) => llm.classify(query, tenant_id, correlation_id).await,
            None => Ok(Industry::generic()),
        }
    }
}
