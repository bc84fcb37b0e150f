//! Greedy packing of conversation history and retrieved chunks.
//!
//! The prompt is charged first. History is taken newest-first up to the
//! history budget, then chunks in rank order up to the total budget. Each
//! pass stops at the first item that does not fit.

use ragline_core::models::RetrievalResult;
use serde::{Deserialize, Serialize};

use super::{estimate_tokens, ContextBudget};

/// One turn of conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Charged on its serialized form, as it is sent downstream.
    fn tokens(&self) -> usize {
        match serde_json::to_string(self) {
            Ok(json) => estimate_tokens(&json),
            Err(_) => estimate_tokens(&self.content),
        }
    }
}

/// What fit in the budget. History stays in chronological order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackedContext {
    pub history: Vec<ChatMessage>,
    pub chunks: Vec<RetrievalResult>,
    pub tokens: usize,
}

pub fn pack_context(
    prompt: &str,
    history: &[ChatMessage],
    chunks: &[RetrievalResult],
    budget: ContextBudget,
) -> PackedContext {
    let mut used = estimate_tokens(prompt);

    let mut kept_history = Vec::new();
    for message in history.iter().rev() {
        let tokens = message.tokens();
        if used + tokens >= budget.history_max_tokens {
            break;
        }
        kept_history.push(message.clone());
        used += tokens;
    }
    kept_history.reverse();

    let mut kept_chunks = Vec::new();
    for chunk in chunks {
        let tokens = estimate_tokens(&chunk.text);
        if used + tokens >= budget.max_tokens {
            break;
        }
        kept_chunks.push(chunk.clone());
        used += tokens;
    }

    PackedContext {
        history: kept_history,
        chunks: kept_chunks,
        tokens: used,
    }
}
