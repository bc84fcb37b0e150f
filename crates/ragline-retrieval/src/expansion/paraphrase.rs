//! Paraphrase expansion for extra recall passes.

use std::collections::HashSet;

use ragline_core::errors::RagResult;
use tracing::warn;

use super::QueryAugmenter;
use crate::prompts;

/// Split a completion into cleaned variations.
///
/// Drops list markers, blank lines, lines equal to the query, and repeats
/// (case-insensitive). Keeps at most `max` in response order.
pub fn parse_variations(response: &str, query: &str, max: usize) -> Vec<String> {
    let original = query.trim().to_lowercase();
    let mut seen = HashSet::new();
    response
        .lines()
        .map(strip_list_marker)
        .map(|line| line.trim().trim_matches('"').trim())
        .filter(|line| !line.is_empty())
        .filter(|line| line.to_lowercase() != original)
        .filter(|line| seen.insert(line.to_lowercase()))
        .take(max)
        .map(str::to_string)
        .collect()
}

fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    let without_bullet = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .or_else(|| trimmed.strip_prefix("• "));
    if let Some(rest) = without_bullet {
        return rest;
    }
    // "1. foo" / "2) foo"
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest;
        }
    }
    trimmed
}

impl QueryAugmenter {
    /// Paraphrased variations, or the error that prevented them.
    pub async fn try_expand_query(
        &self,
        query: &str,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RagResult<Vec<String>> {
        let max = self.config.max_variations;
        let response = self
            .complete(
                "expansion",
                &prompts::expansion(query, max),
                tenant_id,
                correlation_id,
            )
            .await?;
        Ok(parse_variations(&response, query, max))
    }

    /// Paraphrased variations, or an empty list on any failure.
    pub async fn expand_query(&self, query: &str, tenant_id: &str, correlation_id: &str) -> Vec<String> {
        match self.try_expand_query(query, tenant_id, correlation_id).await {
            Ok(variations) => variations,
            Err(e) => {
                warn!(error = %e, "query expansion failed, continuing without variations");
                Vec::new()
            }
        }
    }
}
