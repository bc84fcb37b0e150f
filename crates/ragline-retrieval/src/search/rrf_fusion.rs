//! Weighted Reciprocal Rank Fusion: score = Σ w_b / (k + rank_b)
//!
//! Combines ranked lists from heterogeneous branches into one ordering
//! without normalizing their native scores. `rank_b` is 0-based.

use std::collections::HashMap;

use ragline_core::config::RetrievalConfig;
use ragline_core::constants::GRAPH_PINNED_SCORE;
use ragline_core::models::{RankedCandidate, RetrievalResult};

use crate::prompts::truncate_chars;

/// One branch's ranked output and its fusion weight.
#[derive(Debug, Clone)]
pub struct RankedList {
    pub weight: f64,
    pub results: Vec<RetrievalResult>,
}

impl RankedList {
    pub fn new(weight: f64, results: Vec<RetrievalResult>) -> Self {
        Self { weight, results }
    }
}

/// Fuses ranked lists into a deduplicated shortlist.
#[derive(Debug, Clone)]
pub struct RankFusionEngine {
    k: u32,
    prefix_chars: usize,
    shortlist: usize,
}

impl RankFusionEngine {
    pub fn new(k: u32, prefix_chars: usize, shortlist: usize) -> Self {
        Self {
            k,
            prefix_chars,
            shortlist,
        }
    }

    pub fn from_config(config: &RetrievalConfig) -> Self {
        Self::new(config.rrf_k, config.dedup_prefix_chars, config.shortlist_size)
    }

    /// Results sharing this key are treated as the same candidate.
    pub fn dedup_key<'a>(&self, text: &'a str) -> &'a str {
        truncate_chars(text, self.prefix_chars)
    }

    /// Fuse `lists`, keep the top `shortlist` candidates, and pin `graph`
    /// (if any) above all of them with the reserved score.
    ///
    /// The first-seen representative of each candidate is kept. Equal
    /// scores keep first-seen order.
    pub fn fuse(&self, lists: &[RankedList], graph: Option<RetrievalResult>) -> Vec<RankedCandidate> {
        self.fuse_for_limit(lists, graph, 0)
    }

    /// Like [`fuse`](Self::fuse), but the shortlist grows to `limit` when
    /// the caller wants more results than `shortlist`.
    pub fn fuse_for_limit(
        &self,
        lists: &[RankedList],
        graph: Option<RetrievalResult>,
        limit: usize,
    ) -> Vec<RankedCandidate> {
        let mut candidates: Vec<RankedCandidate> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for list in lists {
            for (rank, result) in list.results.iter().enumerate() {
                let contribution = list.weight * (1.0 / (rank as f64 + self.k as f64));
                let key = self.dedup_key(&result.text);
                match index.get(key) {
                    Some(&pos) => candidates[pos].fusion_score += contribution,
                    None => {
                        index.insert(key, candidates.len());
                        candidates.push(RankedCandidate {
                            result: result.clone(),
                            fusion_score: contribution,
                        });
                    }
                }
            }
        }

        // Stable sort by fused score descending (monotonically decreasing).
        candidates.sort_by(|a, b| {
            b.fusion_score
                .partial_cmp(&a.fusion_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates.truncate(self.shortlist.max(limit));

        if let Some(graph) = graph {
            candidates.insert(
                0,
                RankedCandidate {
                    result: graph,
                    fusion_score: GRAPH_PINNED_SCORE,
                },
            );
        }
        candidates
    }
}
