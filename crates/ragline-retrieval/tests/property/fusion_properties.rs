use std::collections::HashSet;

use proptest::prelude::*;
use ragline_core::constants::GRAPH_PINNED_SCORE;
use ragline_core::models::{BranchKind, RetrievalResult};
use ragline_retrieval::search::{RankFusionEngine, RankedList};

fn lists_strategy() -> impl Strategy<Value = Vec<(f64, Vec<String>)>> {
    prop::collection::vec(
        (0.1f64..3.0, prop::collection::vec("[a-e]{1,3}", 0..12)),
        0..5,
    )
}

fn to_lists(raw: &[(f64, Vec<String>)]) -> Vec<RankedList> {
    raw.iter()
        .map(|(weight, texts)| {
            RankedList::new(
                *weight,
                texts
                    .iter()
                    .map(|t| RetrievalResult::new(t.as_str(), "doc.pdf", BranchKind::Lexical))
                    .collect(),
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn scores_are_non_increasing(raw in lists_strategy()) {
        let engine = RankFusionEngine::new(60, 150, 15);
        let fused = engine.fuse(&to_lists(&raw), None);
        for pair in fused.windows(2) {
            prop_assert!(pair[0].fusion_score >= pair[1].fusion_score);
        }
    }

    #[test]
    fn no_two_candidates_share_a_key(raw in lists_strategy(), prefix in 1usize..4) {
        let engine = RankFusionEngine::new(60, prefix, 50);
        let fused = engine.fuse(&to_lists(&raw), None);
        let mut keys = HashSet::new();
        for candidate in &fused {
            prop_assert!(keys.insert(engine.dedup_key(&candidate.result.text).to_string()));
        }
    }

    #[test]
    fn shortlist_bounds_the_output(raw in lists_strategy(), shortlist in 1usize..20, graph in any::<bool>()) {
        let engine = RankFusionEngine::new(60, 150, shortlist);
        let graph = graph.then(|| RetrievalResult::new("graph summary", "KNOWLEDGE_GRAPH", BranchKind::GraphContext));
        let pinned = graph.is_some();
        let fused = engine.fuse(&to_lists(&raw), graph);

        prop_assert!(fused.len() <= shortlist + usize::from(pinned));
        if pinned {
            prop_assert_eq!(fused[0].fusion_score, GRAPH_PINNED_SCORE);
            prop_assert_eq!(fused[0].result.branch, BranchKind::GraphContext);
            prop_assert!(fused[1..].iter().all(|c| c.fusion_score < GRAPH_PINNED_SCORE));
        }
    }

    #[test]
    fn every_distinct_input_is_represented_when_it_fits(raw in lists_strategy()) {
        let engine = RankFusionEngine::new(60, 150, 1_000);
        let fused = engine.fuse(&to_lists(&raw), None);
        let distinct: HashSet<&str> = raw.iter().flat_map(|(_, t)| t.iter().map(String::as_str)).collect();
        prop_assert_eq!(fused.len(), distinct.len());
    }
}
