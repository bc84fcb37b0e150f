//! Token budgeting for downstream generation prompts.

pub mod packer;

use ragline_core::config::defaults;
use ragline_core::constants::CHARS_PER_TOKEN;

pub use packer::{pack_context, ChatMessage, PackedContext};

/// Token limits for one generation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBudget {
    /// Prompt, history and chunks together stay under this.
    pub max_tokens: usize,
    /// Prompt and history together stay under this.
    pub history_max_tokens: usize,
}

impl Default for ContextBudget {
    fn default() -> Self {
        Self {
            max_tokens: defaults::DEFAULT_CONTEXT_MAX_TOKENS,
            history_max_tokens: defaults::DEFAULT_HISTORY_MAX_TOKENS,
        }
    }
}

/// Rough token count: one token per `CHARS_PER_TOKEN` characters, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}
