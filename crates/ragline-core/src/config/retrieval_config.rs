use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-list weights for weighted reciprocal rank fusion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionWeights {
    pub dense_primary: f64,
    pub dense_multilingual: f64,
    pub lexical: f64,
    /// Applied to results retrieved for paraphrased query variations.
    pub expansion: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            dense_primary: defaults::DEFAULT_WEIGHT_DENSE_PRIMARY,
            dense_multilingual: defaults::DEFAULT_WEIGHT_DENSE_MULTILINGUAL,
            lexical: defaults::DEFAULT_WEIGHT_LEXICAL,
            expansion: defaults::DEFAULT_WEIGHT_EXPANSION,
        }
    }
}

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Per-branch deadline.
    pub branch_timeout_ms: u64,
    /// Branches fetch `limit * fetch_multiplier` candidates.
    pub fetch_multiplier: usize,
    /// Fused candidates handed to the reranker.
    pub shortlist_size: usize,
    /// RRF k-value for rank fusion.
    pub rrf_k: u32,
    /// Leading characters of a result's text used as its dedup key.
    pub dedup_prefix_chars: usize,
    pub weights: FusionWeights,
    /// MMR candidate pool for the primary dense branch.
    pub mmr_fetch_k: usize,
    /// MMR relevance/diversity trade-off (1.0 = pure relevance).
    pub mmr_lambda: f64,
    /// Score assigned to dense hits the store returns without one.
    pub default_dense_score: f64,
    /// Tenants whose documents are visible to every tenant.
    pub shared_tenants: Vec<String>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            branch_timeout_ms: defaults::DEFAULT_BRANCH_TIMEOUT_MS,
            fetch_multiplier: defaults::DEFAULT_FETCH_MULTIPLIER,
            shortlist_size: defaults::DEFAULT_SHORTLIST_SIZE,
            rrf_k: defaults::DEFAULT_RRF_K,
            dedup_prefix_chars: defaults::DEFAULT_DEDUP_PREFIX_CHARS,
            weights: FusionWeights::default(),
            mmr_fetch_k: defaults::DEFAULT_MMR_FETCH_K,
            mmr_lambda: defaults::DEFAULT_MMR_LAMBDA,
            default_dense_score: defaults::DEFAULT_DENSE_SCORE,
            shared_tenants: defaults::DEFAULT_SHARED_TENANTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RetrievalConfig {
    pub fn branch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.branch_timeout_ms)
    }
}
