use criterion::{black_box, criterion_group, criterion_main, Criterion};

use ragline_core::models::{BranchKind, RetrievalResult};
use ragline_retrieval::ranking::parse_response;
use ragline_retrieval::search::{RankFusionEngine, RankedList};

/// Seven lists of 36 results with heavy overlap, the shape of a deep search
/// with three expansion variations.
fn build_lists() -> Vec<RankedList> {
    let weights = [1.0, 1.2, 1.5, 0.8, 0.8, 0.8, 0.8];
    weights
        .iter()
        .enumerate()
        .map(|(b, &weight)| {
            let results = (0..36)
                .map(|i| {
                    let text = format!("fragment {} {}", (i * (b + 1)) % 60, "lorem ipsum ".repeat(20));
                    RetrievalResult::new(text, format!("doc-{i}.pdf"), BranchKind::DensePrimary)
                })
                .collect();
            RankedList::new(weight, results)
        })
        .collect()
}

fn bench_fuse(c: &mut Criterion) {
    let lists = build_lists();
    let engine = RankFusionEngine::new(60, 150, 15);
    let graph = RetrievalResult::new("summary", "KNOWLEDGE_GRAPH", BranchKind::GraphContext);

    c.bench_function("fuse_7x36", |b| {
        b.iter(|| engine.fuse(black_box(&lists), Some(graph.clone())))
    });
}

fn bench_parse_rerank(c: &mut Criterion) {
    let body = (0..15)
        .map(|i| format!("{{\"index\": {i}, \"score\": 0.{i:02}, \"reason\": \"matches term {i}\"}}"))
        .collect::<Vec<_>>()
        .join(",");
    let raw = format!("```json\n[{body}]\n```");

    c.bench_function("parse_rerank_15", |b| {
        b.iter(|| parse_response(black_box(&raw), 15))
    });
}

criterion_group!(benches, bench_fuse, bench_parse_rerank);
criterion_main!(benches);
