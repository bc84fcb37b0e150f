use serde::{Deserialize, Serialize};

use super::defaults;

/// Relevance-model reranking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankConfig {
    pub enabled: bool,
    /// Characters of each candidate included in the prompt.
    pub fragment_chars: usize,
    /// Extra attempts after a failed call or unparseable response.
    pub max_retries: u32,
    /// Backoff before retry `n` is `n * retry_backoff_ms`.
    pub retry_backoff_ms: u64,
    /// Deadline for each attempt.
    pub call_timeout_ms: u64,
    pub temperature: f32,
    pub model: Option<String>,
}

impl Default for RerankConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_RERANK_ENABLED,
            fragment_chars: defaults::DEFAULT_RERANK_FRAGMENT_CHARS,
            max_retries: defaults::DEFAULT_RERANK_MAX_RETRIES,
            retry_backoff_ms: defaults::DEFAULT_RERANK_RETRY_BACKOFF_MS,
            call_timeout_ms: defaults::DEFAULT_RERANK_TIMEOUT_MS,
            temperature: defaults::DEFAULT_RERANK_TEMPERATURE,
            model: None,
        }
    }
}
