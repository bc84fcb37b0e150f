mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{request, result, FailingBranch, StaticBranch};
use ragline_cache::{InMemoryCacheStore, InMemorySemanticStore, SemanticCache};
use ragline_core::config::{CacheConfig, RaglineConfig};
use ragline_core::constants::GRAPH_SOURCE;
use ragline_core::models::{
    BranchKind, BranchStatus, CacheHitTier, Environment, Industry, IndustryConstraint,
    IntensityMode,
};
use ragline_observability::BufferedTraceSink;
use ragline_retrieval::search::{
    DenseMultilingualSearch, DensePrimarySearch, GraphContextSearch, LexicalSearch,
};
use ragline_retrieval::{HybridSearchOrchestrator, RetrievalBranch};
use test_fixtures::{
    load_fixture, FailingEmbedder, InMemoryKeywordIndex, InMemoryVectorStore, MappedEmbedder,
    Scenario, ScriptedLlm, StaticGraph, StoredChunk, CORRELATION_ID,
};
use tokio::time::Instant;

fn four_static_branches(delay: Option<Duration>) -> Vec<Arc<StaticBranch>> {
    [
        (BranchKind::DensePrimary, "primary"),
        (BranchKind::DenseMultilingual, "multilingual"),
        (BranchKind::Lexical, "lexical"),
        (BranchKind::GraphContext, "graph"),
    ]
    .into_iter()
    .map(|(kind, label)| {
        let branch = StaticBranch::single(kind, label);
        Arc::new(match delay {
            Some(d) => branch.with_delay(d),
            None => branch,
        })
    })
    .collect()
}

fn orchestrator_with(branches: &[Arc<StaticBranch>]) -> HybridSearchOrchestrator {
    branches
        .iter()
        .fold(
            HybridSearchOrchestrator::builder(RaglineConfig::default()),
            |builder, b| builder.branch(Arc::clone(b) as Arc<dyn RetrievalBranch>),
        )
        .build()
}

// --- Concurrency ---

#[tokio::test(start_paused = true)]
async fn latency_tracks_the_slowest_branch_not_the_sum() {
    let branches = four_static_branches(Some(Duration::from_secs(1)));
    let orchestrator = orchestrator_with(&branches);

    let started = Instant::now();
    let outcome = orchestrator.search_with_report(request("q")).await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
    assert_eq!(outcome.report.branches.len(), 4);
    assert!(outcome
        .report
        .branches
        .iter()
        .all(|b| b.status == BranchStatus::Fulfilled));
}

#[tokio::test(start_paused = true)]
async fn a_hung_branch_costs_at_most_its_deadline() {
    let branches = vec![
        Arc::new(StaticBranch::single(BranchKind::Lexical, "lexical")),
        Arc::new(
            StaticBranch::single(BranchKind::GraphContext, "graph")
                .with_delay(Duration::from_secs(60)),
        ),
    ];
    let orchestrator = orchestrator_with(&branches);

    let started = Instant::now();
    let outcome = orchestrator.search_with_report(request("q")).await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed >= Duration::from_secs(15));
    assert!(elapsed < Duration::from_secs(16), "took {elapsed:?}");
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].text, "lexical");
    let graph = &outcome.report.branches[1];
    assert_eq!(graph.branch, BranchKind::GraphContext);
    assert_eq!(graph.status, BranchStatus::TimedOut);
}

// --- Cache ---

#[tokio::test]
async fn repeated_queries_are_served_from_cache_without_branch_calls() {
    let branches = four_static_branches(None);
    let cache = SemanticCache::new(CacheConfig::default(), Arc::new(MappedEmbedder::new("m")));
    let orchestrator = branches
        .iter()
        .fold(
            HybridSearchOrchestrator::builder(RaglineConfig::default()).cache(cache),
            |builder, b| builder.branch(Arc::clone(b) as Arc<dyn RetrievalBranch>),
        )
        .build();

    let first = orchestrator.search_with_report(request("Freno")).await.unwrap();
    let second = orchestrator.search_with_report(request("  freno ")).await.unwrap();

    assert_eq!(first.report.cache_tier, Some(CacheHitTier::Miss));
    assert_eq!(second.report.cache_tier, Some(CacheHitTier::L1));
    assert_eq!(first.results, second.results);
    assert!(branches.iter().all(|b| b.calls() == 1));

    // Another tenant never sees the entry.
    let other = request("Freno");
    let other = ragline_core::models::SearchRequest {
        tenant_id: "t2".to_string(),
        ..other
    };
    let third = orchestrator.search_with_report(other).await.unwrap();
    assert_eq!(third.report.cache_tier, Some(CacheHitTier::Miss));
    assert!(branches.iter().all(|b| b.calls() == 2));
}

#[tokio::test]
async fn cache_write_handle_reports_the_background_write() {
    let kv = Arc::new(InMemoryCacheStore::new());
    let cache = SemanticCache::new(CacheConfig::default(), Arc::new(MappedEmbedder::new("m")))
        .with_l2(kv.clone());
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .cache(cache)
        .branch(Arc::new(StaticBranch::single(BranchKind::Lexical, "a")))
        .build();

    let outcome = orchestrator.search_with_report(request("q")).await.unwrap();
    outcome.cache_write.expect("write scheduled").await.unwrap();
    assert_eq!(kv.len(), 1);

    orchestrator.clear_cache_l1();
    let again = orchestrator.search_with_report(request("q")).await.unwrap();
    assert_eq!(again.report.cache_tier, Some(CacheHitTier::L2));
}

#[tokio::test]
async fn disabled_cache_is_never_consulted() {
    let mut config = RaglineConfig::default();
    config.cache.enabled = false;
    let branch = Arc::new(StaticBranch::single(BranchKind::Lexical, "a"));
    let orchestrator = HybridSearchOrchestrator::builder(config)
        .cache(SemanticCache::new(
            CacheConfig::default(),
            Arc::new(MappedEmbedder::new("m")),
        ))
        .branch(branch.clone())
        .build();

    orchestrator.search(request("q")).await.unwrap();
    let outcome = orchestrator.search_with_report(request("q")).await.unwrap();
    assert_eq!(outcome.report.cache_tier, None);
    assert_eq!(branch.calls(), 2);
}

// --- Failure tolerance ---

#[tokio::test(start_paused = true)]
async fn survivors_answer_when_one_branch_rejects_and_another_hangs() {
    let chunk = StoredChunk::new("c1", "El paracaidas actua sobre las guias", "manual.pdf", "t1");
    let primary = DensePrimarySearch::new(
        Arc::new(MappedEmbedder::new("primary")),
        Arc::new(InMemoryVectorStore::new(vec![chunk.clone()])),
        20,
        0.5,
        0.85,
    );
    let multilingual = DenseMultilingualSearch::new(
        Arc::new(FailingEmbedder::new("multilingual")),
        Arc::new(InMemoryVectorStore::new(vec![chunk.clone()])),
        0.85,
    );
    let lexical = LexicalSearch::new(Arc::new(InMemoryKeywordIndex::new(vec![
        StoredChunk::new("k1", "paracaidas rearme manual", "codigos.pdf", "t1"),
    ])));
    let graph = GraphContextSearch::new(Arc::new(
        StaticGraph::new(Some("summary")).with_delay(Duration::from_secs(60)),
    ));

    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .branch(Arc::new(primary))
        .branch(Arc::new(multilingual))
        .branch(Arc::new(lexical))
        .branch(Arc::new(graph))
        .build();

    let outcome = orchestrator
        .search_with_report(request("paracaidas"))
        .await
        .expect("partial failure is not an error");

    assert!(!outcome.results.is_empty());
    assert!(!outcome.report.degraded);
    let statuses: Vec<_> = outcome.report.branches.iter().map(|b| b.status).collect();
    assert_eq!(
        statuses,
        vec![
            BranchStatus::Fulfilled,
            BranchStatus::Rejected,
            BranchStatus::Fulfilled,
            BranchStatus::TimedOut,
        ]
    );
    assert!(outcome.results.iter().all(|r| r.source != GRAPH_SOURCE));

    let active: Vec<_> = orchestrator
        .degradations()
        .into_iter()
        .map(|d| d.event.component)
        .collect();
    assert!(active.contains(&"dense_multilingual".to_string()));
    assert!(active.contains(&"graph_context".to_string()));
}

#[tokio::test]
async fn total_failure_is_an_empty_degraded_answer() {
    let trace = Arc::new(BufferedTraceSink::new());
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .llm(Arc::new(ScriptedLlm::new()))
        .branch(Arc::new(FailingBranch::new(BranchKind::DensePrimary)))
        .branch(Arc::new(FailingBranch::new(BranchKind::DenseMultilingual)))
        .branch(Arc::new(FailingBranch::new(BranchKind::Lexical)))
        .branch(Arc::new(FailingBranch::new(BranchKind::GraphContext)))
        .build();

    let outcome = orchestrator
        .search_with_report(request("q").with_trace(trace.clone()))
        .await
        .expect("never an error");

    assert!(outcome.results.is_empty());
    assert!(outcome.report.degraded);
    assert!(!outcome.report.hyde_applied);
    assert!(trace.contains("DEGRADED"));
}

// --- Deadlines on collaborators ---

/// One lexical branch, no domain refinement, no augmentation.
fn lexical_only(config: RaglineConfig) -> (RaglineConfig, Arc<StaticBranch>) {
    let mut config = config;
    config.domain.enabled = false;
    config.augmentation.hyde_enabled = false;
    config.augmentation.expansion_enabled = false;
    let branch = Arc::new(StaticBranch::new(
        BranchKind::Lexical,
        vec![
            result(BranchKind::Lexical, "first", "a.pdf"),
            result(BranchKind::Lexical, "second", "b.pdf"),
        ],
    ));
    (config, branch)
}

#[tokio::test(start_paused = true)]
async fn a_stalled_reranker_falls_back_to_fused_order() {
    let (config, branch) = lexical_only(RaglineConfig::default());
    let llm = Arc::new(ScriptedLlm::new().slow_when("", Duration::from_secs(3600), "[]"));
    let orchestrator = HybridSearchOrchestrator::builder(config)
        .llm(llm)
        .branch(branch)
        .build();

    let started = Instant::now();
    let outcome = orchestrator.search_with_report(request("q")).await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(11), "took {elapsed:?}");
    assert!(outcome.report.rerank_fallback);
    let texts: Vec<_> = outcome.results.iter().map(|r| r.text.as_str()).collect();
    assert_eq!(texts, vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn a_stalled_semantic_cache_is_a_miss_not_a_hang() {
    let (config, branch) = lexical_only(RaglineConfig::default());
    let embedder = Arc::new(MappedEmbedder::new("m").with_delay(Duration::from_secs(3600)));
    let cache = SemanticCache::new(config.cache.clone(), embedder)
        .with_l3(Arc::new(InMemorySemanticStore::new()));
    let orchestrator = HybridSearchOrchestrator::builder(config)
        .cache(cache)
        .branch(branch.clone())
        .build();

    let started = Instant::now();
    let outcome = orchestrator.search_with_report(request("q")).await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_secs(3), "took {elapsed:?}");
    assert_eq!(outcome.report.cache_tier, Some(CacheHitTier::Miss));
    assert_eq!(branch.calls(), 1);
    assert_eq!(outcome.results.len(), 2);
}

// --- Limits ---

#[tokio::test]
async fn limits_above_the_shortlist_are_filled() {
    let texts: Vec<String> = (0..40).map(|i| format!("fragment {i}")).collect();
    let branch = Arc::new(StaticBranch::new(
        BranchKind::Lexical,
        texts
            .iter()
            .map(|t| result(BranchKind::Lexical, t, "doc.pdf"))
            .collect(),
    ));
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .branch(branch)
        .build();

    let results = orchestrator.search(request("q").with_limit(25)).await.unwrap();

    assert_eq!(results.len(), 25);
    assert_eq!(results[0].text, "fragment 0");
    assert_eq!(results[24].text, "fragment 24");
}

// --- Validation ---

#[tokio::test]
async fn malformed_requests_are_rejected_before_any_work() {
    let branch = Arc::new(StaticBranch::single(BranchKind::Lexical, "a"));
    let llm = Arc::new(ScriptedLlm::new().otherwise("x"));
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .llm(llm.clone())
        .branch(branch.clone())
        .build();

    let bad = [
        request("   "),
        request("q").with_limit(0),
        request("q").with_limit(usize::MAX),
        ragline_core::models::SearchRequest::new("q", "", CORRELATION_ID),
        ragline_core::models::SearchRequest::new("q", "t1", "not-a-uuid"),
    ];
    for req in bad {
        let err = orchestrator.search(req).await.unwrap_err();
        assert!(err.is_validation(), "{err}");
    }
    assert_eq!(branch.calls(), 0);
    assert_eq!(llm.calls(), 0);
}

// --- Modes ---

#[tokio::test]
async fn keyword_only_never_embeds() {
    let embedder = Arc::new(MappedEmbedder::new("primary"));
    let chunk = StoredChunk::new("c1", "freno de seguridad", "manual.pdf", "t1");
    let primary = DensePrimarySearch::new(
        embedder.clone(),
        Arc::new(InMemoryVectorStore::new(vec![chunk.clone()])),
        20,
        0.5,
        0.85,
    );
    let multilingual = DenseMultilingualSearch::new(
        embedder.clone(),
        Arc::new(InMemoryVectorStore::new(vec![chunk.clone()])),
        0.85,
    );
    let lexical = LexicalSearch::new(Arc::new(InMemoryKeywordIndex::new(vec![
        StoredChunk::new("k1", "freno de seguridad", "codigos.pdf", "t1"),
        StoredChunk::new("k2", "freno", "otros.pdf", "t1"),
    ])));
    let cache = SemanticCache::new(CacheConfig::default(), embedder.clone())
        .with_l3(Arc::new(InMemorySemanticStore::new()));
    let llm = Arc::new(ScriptedLlm::new().otherwise("x"));

    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .llm(llm.clone())
        .cache(cache)
        .branch(Arc::new(primary))
        .branch(Arc::new(multilingual))
        .branch(Arc::new(lexical))
        .build();

    let req = request("freno de seguridad")
        .with_intensity(IntensityMode::KwOnly)
        .with_limit(1);
    let outcome = orchestrator.search_with_report(req).await.unwrap();

    assert_eq!(embedder.calls(), 0);
    assert_eq!(llm.calls(), 0);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].source, "codigos.pdf");
    assert_eq!(outcome.results[0].branch, BranchKind::Lexical);
    assert_eq!(outcome.report.branches.len(), 1);
}

#[tokio::test]
async fn fast_mode_skips_query_augmentation() {
    let llm = Arc::new(ScriptedLlm::new().otherwise("x"));
    let primary = Arc::new(StaticBranch::single(BranchKind::DensePrimary, "a"));
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .llm(llm.clone())
        .branch(primary.clone())
        .build();

    let req = request("freno")
        .with_intensity(IntensityMode::Fast)
        .with_industry(Industry::new("LEGAL"));
    let outcome = orchestrator.search_with_report(req).await.unwrap();

    assert!(!outcome.report.hyde_applied);
    assert_eq!(llm.calls_containing("plausible answer"), 0);
    assert_eq!(llm.calls_containing("alternative phrasings"), 0);
    assert_eq!(primary.calls(), 1);
    assert_eq!(primary.queries()[0].augmented_query, "freno");
}

// --- Domain refinement ---

#[tokio::test]
async fn generic_requests_are_refined_to_the_detected_vertical() {
    let llm = Arc::new(ScriptedLlm::new().otherwise(""));
    let lexical = Arc::new(StaticBranch::single(BranchKind::Lexical, "a"));
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .llm(llm.clone())
        .branch(lexical.clone())
        .build();

    let outcome = orchestrator
        .search_with_report(request("clausula del contrato de arrendamiento"))
        .await
        .unwrap();

    assert_eq!(outcome.report.industry, Industry::new("LEGAL"));
    let seen = &lexical.queries()[0];
    assert_eq!(seen.industry, Industry::new("LEGAL"));
    assert_eq!(
        seen.filter.industry,
        IndustryConstraint::OneOf(Industry::new("LEGAL"))
    );
    // Keywords decided; the model was not asked.
    assert_eq!(llm.calls_containing("Classify the following text"), 0);
}

#[tokio::test]
async fn explicit_verticals_outside_the_refinable_set_are_kept() {
    let llm = Arc::new(ScriptedLlm::new().otherwise("MEDICAL"));
    let lexical = Arc::new(StaticBranch::single(BranchKind::Lexical, "a"));
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .llm(llm.clone())
        .branch(lexical.clone())
        .build();

    let req = request("contrato").with_industry(Industry::new("BANKING"));
    let outcome = orchestrator.search_with_report(req).await.unwrap();

    assert_eq!(outcome.report.industry, Industry::new("BANKING"));
    assert_eq!(llm.calls_containing("Classify the following text"), 0);
}

// --- Scoping ---

#[tokio::test]
async fn branches_receive_the_request_scope_and_fetch_three_times_the_limit() {
    let lexical = Arc::new(StaticBranch::single(BranchKind::Lexical, "a"));
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .branch(lexical.clone())
        .build();

    let req = request("q")
        .with_limit(5)
        .with_environment(Environment::Staging)
        .with_space("space-9")
        .with_filename("manual.pdf");
    orchestrator.search(req).await.unwrap();

    let seen = &lexical.queries()[0];
    assert_eq!(seen.limit, 15);
    assert_eq!(seen.filter.environments, vec![Environment::Staging]);
    assert_eq!(seen.filter.space_id.as_deref(), Some("space-9"));
    assert_eq!(seen.filter.filename.as_deref(), Some("manual.pdf"));
    assert!(seen.filter.tenant_ids.contains(&"t1".to_string()));
    assert!(seen.filter.tenant_ids.contains(&"global".to_string()));
}

// --- Golden scenario ---

#[tokio::test]
async fn freno_de_seguridad_follows_the_scripted_rerank_order() {
    let scenario: Scenario = load_fixture("scenarios/freno_de_seguridad.json");
    let chunks = |list: &[test_fixtures::scenario::ScenarioChunk]| -> Vec<StoredChunk> {
        list.iter()
            .map(|c| StoredChunk::new(&c.id, &c.text, &c.source, &scenario.tenant_id))
            .collect()
    };

    let llm = Arc::new(
        ScriptedLlm::new()
            .reply_when("plausible answer", &scenario.hyde_answer)
            .reply_when("alternative phrasings", "")
            .reply_when("Classify the following text", "GENERIC")
            .reply_when("Fragments:", &scenario.rerank_response),
    );
    let embedder = Arc::new(MappedEmbedder::new("primary"));
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .llm(llm.clone())
        .branch(Arc::new(DensePrimarySearch::new(
            embedder.clone(),
            Arc::new(InMemoryVectorStore::new(chunks(&scenario.dense_primary))),
            20,
            0.5,
            0.85,
        )))
        .branch(Arc::new(DenseMultilingualSearch::new(
            Arc::new(MappedEmbedder::new("multilingual")),
            Arc::new(InMemoryVectorStore::new(chunks(&scenario.dense_multilingual))),
            0.85,
        )))
        .branch(Arc::new(LexicalSearch::new(Arc::new(
            InMemoryKeywordIndex::new(chunks(&scenario.lexical)),
        ))))
        .branch(Arc::new(GraphContextSearch::new(Arc::new(StaticGraph::new(
            scenario.graph_summary.as_deref(),
        )))))
        .build();

    let req = ragline_core::models::SearchRequest::new(
        &scenario.query,
        &scenario.tenant_id,
        CORRELATION_ID,
    )
    .with_limit(scenario.limit);
    let outcome = orchestrator.search_with_report(req).await.unwrap();

    let sources: Vec<_> = outcome.results.iter().map(|r| r.source.clone()).collect();
    assert_eq!(sources, scenario.expected_sources);
    let mut unique = sources.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), sources.len());

    assert!(outcome.report.hyde_applied);
    assert!(!outcome.report.rerank_fallback);
    assert_eq!(outcome.report.fused, 4);
    assert_eq!(outcome.results[0].rerank_reason.as_deref(), Some("describes the mechanism"));
    assert_eq!(outcome.results[0].score, Some(0.95));

    let rerank_prompt = llm
        .prompts()
        .into_iter()
        .find(|p| p.contains("Fragments:"))
        .unwrap();
    assert!(rerank_prompt.contains("\"GENERIC\""));
    assert!(rerank_prompt.contains("[3] El freno de seguridad actua"));
}

#[tokio::test]
async fn unusable_rerank_answers_fall_back_to_fused_order() {
    let llm = Arc::new(
        ScriptedLlm::new()
            .reply_when("alternative phrasings", "")
            .otherwise("no idea"),
    );
    let trace = Arc::new(BufferedTraceSink::new());
    let orchestrator = HybridSearchOrchestrator::builder(RaglineConfig::default())
        .llm(llm)
        .branch(Arc::new(StaticBranch::single(BranchKind::DensePrimary, "primary")))
        .branch(Arc::new(StaticBranch::single(BranchKind::Lexical, "lexical")))
        .build();

    let outcome = orchestrator
        .search_with_report(request("q").with_trace(trace.clone()))
        .await
        .unwrap();

    assert!(outcome.report.rerank_fallback);
    let texts: Vec<_> = outcome.results.iter().map(|r| r.text.as_str()).collect();
    // lexical (1.5/60) outranks primary (1.0/60)
    assert_eq!(texts, vec!["lexical", "primary"]);
    assert!(trace.contains("RERANKING"));
    assert!(trace.contains("DONE: 2 results"));
}
