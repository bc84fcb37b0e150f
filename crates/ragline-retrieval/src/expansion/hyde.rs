//! Hypothetical Document Embedding (HyDE).
//!
//! Asks the completion model for a plausible answer and appends it to the
//! query, so dense branches search near where an answer would live.

use ragline_core::constants::HYDE_MARKER;
use ragline_core::errors::{ExternalServiceError, RagResult, Service};
use tracing::{debug, warn};

use super::QueryAugmenter;
use crate::prompts;

/// `"{query}\n\n[HYDE]: {answer}"`.
pub fn augment_with_answer(query: &str, answer: &str) -> String {
    format!("{query}\n\n{HYDE_MARKER} {answer}")
}

impl QueryAugmenter {
    /// The augmented query, or the error that prevented it.
    pub async fn try_generate_hyde(
        &self,
        query: &str,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RagResult<String> {
        let answer = self
            .complete("hyde", &prompts::hyde(query), tenant_id, correlation_id)
            .await?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(ExternalServiceError::MalformedResponse {
                service: Service::Llm,
                reason: "empty hypothetical answer".to_string(),
            }
            .into());
        }
        debug!(answer_chars = answer.chars().count(), "hyde answer generated");
        Ok(augment_with_answer(query, answer))
    }

    /// The augmented query, or `query` unchanged on any failure.
    pub async fn generate_hyde(&self, query: &str, tenant_id: &str, correlation_id: &str) -> String {
        match self.try_generate_hyde(query, tenant_id, correlation_id).await {
            Ok(augmented) => augmented,
            Err(e) => {
                warn!(error = %e, "hyde generation failed, using original query");
                query.to_string()
            }
        }
    }
}
