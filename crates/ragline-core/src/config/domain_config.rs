use serde::{Deserialize, Serialize};

use super::defaults;

/// Domain (industry) refinement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub enabled: bool,
    /// Caller-supplied industries that may be replaced by a detected one.
    pub refinable_industries: Vec<String>,
    /// Ask the completion collaborator when no keyword matches.
    pub llm_fallback: bool,
    pub llm_retries: u32,
    pub llm_timeout_ms: u64,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::DEFAULT_DOMAIN_ENABLED,
            refinable_industries: defaults::DEFAULT_REFINABLE_INDUSTRIES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            llm_fallback: defaults::DEFAULT_DOMAIN_LLM_FALLBACK,
            llm_retries: defaults::DEFAULT_DOMAIN_LLM_RETRIES,
            llm_timeout_ms: defaults::DEFAULT_DOMAIN_LLM_TIMEOUT_MS,
        }
    }
}
