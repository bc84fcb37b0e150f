//! LLM reranker: one prompt over the numbered shortlist, JSON ranking back.
//!
//! Any call or parse failure falls back to the fused order.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use ragline_core::config::RerankConfig;
use ragline_core::errors::{RagError, RagResult, RerankError};
use ragline_core::models::{Industry, RetrievalResult};
use ragline_core::traits::{GenerationOptions, LlmCompletion};
use ragline_observability::tracing_setup::events;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::prompts;

/// One validated entry of a rerank response.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankEntry {
    pub index: usize,
    pub score: f64,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    index: i64,
    score: f64,
    #[serde(default)]
    reason: Option<String>,
}

/// Reranked results and whether the fused order was used instead.
#[derive(Debug, Clone)]
pub struct RerankOutcome {
    pub results: Vec<RetrievalResult>,
    pub fell_back: bool,
}

/// Parse a rerank response for a shortlist of `candidates` entries.
///
/// Markdown fences and surrounding prose are ignored. Entries with an
/// out-of-range index, a non-finite score, or an index already seen are
/// skipped. The surviving entries keep response order.
pub fn parse_response(raw: &str, candidates: usize) -> Result<Vec<RerankEntry>, RerankError> {
    let body = strip_fences(raw);
    let (start, end) = match (body.find('['), body.rfind(']')) {
        (Some(start), Some(end)) if start < end => (start, end),
        _ => {
            return Err(RerankError::Unparseable {
                reason: "no JSON array found".to_string(),
            })
        }
    };
    let values: Vec<serde_json::Value> =
        serde_json::from_str(&body[start..=end]).map_err(|e| RerankError::Unparseable {
            reason: e.to_string(),
        })?;

    let mut seen = HashSet::new();
    let entries: Vec<RerankEntry> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value::<RawEntry>(v).ok())
        .filter(|e| e.score.is_finite())
        .filter_map(|e| {
            let index = usize::try_from(e.index).ok()?;
            (index < candidates && seen.insert(index)).then_some(RerankEntry {
                index,
                score: e.score,
                reason: e.reason,
            })
        })
        .collect();

    if entries.is_empty() {
        return Err(RerankError::NoValidEntries);
    }
    Ok(entries)
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

/// Reorders a fused shortlist with a completion model.
pub struct LlmReranker {
    llm: Arc<dyn LlmCompletion>,
    config: RerankConfig,
}

impl LlmReranker {
    pub fn new(llm: Arc<dyn LlmCompletion>, config: RerankConfig) -> Self {
        Self { llm, config }
    }

    pub fn config(&self) -> &RerankConfig {
        &self.config
    }

    /// Reranked results (at most `limit`), falling back to the fused order.
    pub async fn rerank(
        &self,
        query: &str,
        industry: &Industry,
        candidates: Vec<RetrievalResult>,
        limit: usize,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RerankOutcome {
        if !self.config.enabled || candidates.len() <= 1 {
            return RerankOutcome {
                results: candidates.into_iter().take(limit).collect(),
                fell_back: false,
            };
        }

        match self
            .try_rerank(query, industry, &candidates, limit, tenant_id, correlation_id)
            .await
        {
            Ok(results) => RerankOutcome {
                results,
                fell_back: false,
            },
            Err(e) => {
                events::rerank_fallback(candidates.len(), &e.to_string());
                RerankOutcome {
                    results: candidates.into_iter().take(limit).collect(),
                    fell_back: true,
                }
            }
        }
    }

    /// Reranked results, or the last error after every attempt failed.
    ///
    /// Makes `1 + max_retries` attempts, each under `call_timeout_ms`.
    /// Retry `n` waits `n * retry_backoff_ms`.
    pub async fn try_rerank(
        &self,
        query: &str,
        industry: &Industry,
        candidates: &[RetrievalResult],
        limit: usize,
        tenant_id: &str,
        correlation_id: &str,
    ) -> RagResult<Vec<RetrievalResult>> {
        let prompt = prompts::rerank(query, industry, candidates, self.config.fragment_chars);
        let options = GenerationOptions {
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            correlation_id: correlation_id.to_string(),
        };

        let deadline = Duration::from_millis(self.config.call_timeout_ms);

        let mut attempt: u32 = 0;
        loop {
            if attempt > 0 {
                let backoff =
                    Duration::from_millis(self.config.retry_backoff_ms * u64::from(attempt));
                tokio::time::sleep(backoff).await;
            }
            let call = self.llm.generate(&prompt, tenant_id, &options);
            let response = tokio::time::timeout(deadline, call).await;
            let result: RagResult<Vec<RerankEntry>> = match response {
                Ok(Ok(raw)) => parse_response(&raw, candidates.len()).map_err(Into::into),
                Ok(Err(e)) => Err(RerankError::CallFailed {
                    reason: e.to_string(),
                }
                .into()),
                Err(_) => Err(RagError::timeout("rerank", deadline)),
            };
            match result {
                Ok(entries) => {
                    debug!(entries = entries.len(), attempt, "rerank response parsed");
                    return Ok(apply(entries, candidates, limit));
                }
                Err(e) if attempt < self.config.max_retries => {
                    warn!(error = %e, attempt, "rerank attempt failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Map entries back onto candidates, sort by score descending, truncate.
fn apply(entries: Vec<RerankEntry>, candidates: &[RetrievalResult], limit: usize) -> Vec<RetrievalResult> {
    let mut ranked: Vec<RetrievalResult> = entries
        .into_iter()
        .map(|entry| {
            let mut result = candidates[entry.index].clone();
            result.score = Some(entry.score);
            result.rerank_reason = entry.reason;
            result
        })
        .collect();
    ranked.sort_by(|a, b| {
        let (a, b) = (a.score.unwrap_or(0.0), b.score.unwrap_or(0.0));
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(limit);
    ranked
}
