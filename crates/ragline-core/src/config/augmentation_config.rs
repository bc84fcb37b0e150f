use serde::{Deserialize, Serialize};

use super::defaults;

/// HyDE and paraphrase-expansion configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationConfig {
    pub hyde_enabled: bool,
    pub expansion_enabled: bool,
    pub temperature: f32,
    /// Upper bound on paraphrased variations retrieved per request.
    pub max_variations: usize,
    /// Deadline for each augmentation call.
    pub call_timeout_ms: u64,
    /// Model override passed to the completion collaborator.
    pub model: Option<String>,
}

impl Default for AugmentationConfig {
    fn default() -> Self {
        Self {
            hyde_enabled: defaults::DEFAULT_HYDE_ENABLED,
            expansion_enabled: defaults::DEFAULT_EXPANSION_ENABLED,
            temperature: defaults::DEFAULT_AUGMENT_TEMPERATURE,
            max_variations: defaults::DEFAULT_MAX_VARIATIONS,
            call_timeout_ms: defaults::DEFAULT_AUGMENT_TIMEOUT_MS,
            model: None,
        }
    }
}
