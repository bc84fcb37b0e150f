use serde::{Deserialize, Serialize};

use super::{BranchReport, CacheHitTier, Industry};

/// Per-request diagnostics returned alongside the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// `None` when the cache was not consulted.
    pub cache_tier: Option<CacheHitTier>,
    pub industry: Industry,
    pub hyde_applied: bool,
    pub expansion_variations: usize,
    pub branches: Vec<BranchReport>,
    pub fused: usize,
    pub rerank_fallback: bool,
    /// Every branch and every augmentation step failed.
    pub degraded: bool,
    pub elapsed_ms: u64,
}

impl SearchReport {
    pub fn new(industry: Industry) -> Self {
        Self {
            cache_tier: None,
            industry,
            hyde_applied: false,
            expansion_variations: 0,
            branches: Vec::new(),
            fused: 0,
            rerank_fallback: false,
            degraded: false,
            elapsed_ms: 0,
        }
    }
}
