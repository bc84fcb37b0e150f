//! HybridSearchOrchestrator: the request state machine.
//!
//! validate → (KW_ONLY fast path) → cache → domain → HyDE →
//! branches ∥ expansion → fusion → rerank → cache write → return.
//!
//! Only validation errors reach the caller. Every other failure is turned
//! into its step's fallback and recorded with the degradation tracker.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::join_all;
use ragline_cache::SemanticCache;
use ragline_core::config::RaglineConfig;
use ragline_core::constants::DEGRADED_ANNOTATION;
use ragline_core::errors::{RagError, RagResult};
use ragline_core::models::{
    BranchKind, BranchOutcome, BranchSettlement, CacheHitTier, CacheScope, DegradationEvent,
    Industry, IntensityMode, RetrievalResult, SearchFilter, SearchReport, SearchRequest,
};
use ragline_core::traits::{DomainClassifier, LlmCompletion, SpanHandle, Telemetry};
use ragline_observability::tracing_setup::events;
use ragline_observability::tracing_setup::spans::names;
use ragline_observability::{DegradationTracker, NoopTelemetry, TrackedDegradation};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn, Instrument};

use crate::domain::HeuristicThenLlmClassifier;
use crate::expansion::QueryAugmenter;
use crate::ranking::LlmReranker;
use crate::search::scheduler::settle;
use crate::search::{BranchQuery, BranchScheduler, RankFusionEngine, RankedList, RetrievalBranch};

/// Degradation events kept in memory.
const DEGRADATION_HISTORY: usize = 256;

/// Results of one search plus its diagnostics.
#[derive(Debug)]
pub struct SearchOutcome {
    pub results: Vec<RetrievalResult>,
    pub report: SearchReport,
    /// Background L2/L3 cache write, when one was scheduled.
    pub cache_write: Option<JoinHandle<()>>,
}

/// What the expansion pass produced.
#[derive(Debug, Default)]
struct ExpansionPass {
    variations: usize,
    results: Vec<RetrievalResult>,
    failed: bool,
}

/// Sequences every retrieval step for one request.
///
/// Built once per process with [`OrchestratorBuilder`] and shared by handle.
pub struct HybridSearchOrchestrator {
    config: RaglineConfig,
    scheduler: BranchScheduler,
    fusion: RankFusionEngine,
    augmenter: Option<QueryAugmenter>,
    reranker: Option<LlmReranker>,
    cache: Option<SemanticCache>,
    classifier: Option<Arc<dyn DomainClassifier>>,
    telemetry: Arc<dyn Telemetry>,
    degradation: Mutex<DegradationTracker>,
}

impl HybridSearchOrchestrator {
    pub fn builder(config: RaglineConfig) -> OrchestratorBuilder {
        OrchestratorBuilder::new(config)
    }

    pub fn config(&self) -> &RaglineConfig {
        &self.config
    }

    /// Final results for `request`, at most `request.limit` long.
    pub async fn search(&self, request: SearchRequest) -> RagResult<Vec<RetrievalResult>> {
        Ok(self.search_with_report(request).await?.results)
    }

    /// Final results, per-request diagnostics, and the cache-write handle.
    pub async fn search_with_report(&self, request: SearchRequest) -> RagResult<SearchOutcome> {
        let span = ragline_observability::search_span!(
            request.tenant_id,
            request.correlation_id,
            request.intensity
        );
        self.run(request).instrument(span).await
    }

    /// Drop every in-process cache entry.
    pub fn clear_cache_l1(&self) {
        if let Some(cache) = &self.cache {
            cache.clear_l1();
        }
    }

    /// Snapshot of recorded degradation events.
    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        self.degradation
            .lock()
            .map(|t| t.events().to_vec())
            .unwrap_or_default()
    }

    async fn run(&self, mut request: SearchRequest) -> RagResult<SearchOutcome> {
        let started = Instant::now();

        let span = self.step(names::VALIDATE, &request);
        let validated = request.validate();
        span.end();
        validated.map_err(RagError::from)?;

        request.trace(&format!("SEARCH: starting (mode {:?})", request.intensity));

        if request.intensity == IntensityMode::KwOnly {
            return Ok(self.keyword_only(&request, started).await);
        }

        let scope = CacheScope::new(request.tenant_id.clone(), request.environment);
        let mut report = SearchReport::new(request.industry.clone());

        // Cache
        if let Some(cache) = &self.cache {
            let mut span = self.step(names::CACHE_LOOKUP, &request);
            let (hit, tier) = cache
                .get(&request.query, &scope, &request.correlation_id)
                .await;
            span.record("tier", format!("{tier:?}"));
            span.end();
            report.cache_tier = Some(tier);
            if let Some(mut results) = hit {
                request.trace(&format!("CACHE: served from {tier:?}"));
                results.truncate(request.limit);
                return Ok(self.finish(&request, results, report, None, started));
            }
        }

        // Domain refinement
        if let Some(industry) = self.refine_industry(&request).await {
            request.industry = industry;
        }
        report.industry = request.industry.clone();

        // HyDE
        let augment = self.augmentation_enabled(&request);
        let mut hyde_failed = false;
        let augmented_query = match (&self.augmenter, augment) {
            (Some(augmenter), true) if augmenter.config().hyde_enabled => {
                request.trace("HYDE: drafting a hypothetical answer");
                let span = self.step(names::HYDE, &request);
                let result = augmenter
                    .try_generate_hyde(&request.query, &request.tenant_id, &request.correlation_id)
                    .instrument(ragline_observability::augment_span!("hyde"))
                    .await;
                span.end();
                match result {
                    Ok(augmented) => {
                        report.hyde_applied = true;
                        self.recovered("hyde");
                        augmented
                    }
                    Err(e) => {
                        hyde_failed = true;
                        self.degraded("hyde", &e.to_string(), "original query");
                        request.query.clone()
                    }
                }
            }
            _ => request.query.clone(),
        };

        // Branches ∥ expansion
        let filter = SearchFilter::for_request(&request, &self.config.retrieval.shared_tenants);
        let branch_query = BranchQuery {
            query: request.query.clone(),
            augmented_query,
            tenant_id: request.tenant_id.clone(),
            correlation_id: request.correlation_id.clone(),
            limit: request
                .limit
                .saturating_mul(self.config.retrieval.fetch_multiplier),
            industry: request.industry.clone(),
            environment: request.environment,
            filter,
        };
        request.trace(&format!(
            "SEARCH: running {} branches",
            self.scheduler.kinds().len()
        ));
        let span = self.step(names::RETRIEVE, &request);
        let (settlements, expansion) = tokio::join!(
            self.scheduler.run(&branch_query),
            self.expansion_pass(&branch_query, &request, augment)
        );
        span.end();

        report.branches = settlements.iter().map(BranchSettlement::report).collect();
        report.expansion_variations = expansion.variations;
        self.record_branch_health(&request, &settlements);

        let all_branches_failed = settlements
            .iter()
            .all(|s| !matches!(s.outcome, BranchOutcome::Fulfilled(_)));
        let augmentation_failed = !report.hyde_applied && expansion.variations == 0;
        if all_branches_failed && augmentation_failed {
            debug!(hyde_failed, expansion_failed = expansion.failed, "no usable signal");
            report.degraded = true;
            request.trace(&format!(
                "{DEGRADED_ANNOTATION}: every retrieval branch and query augmentation failed"
            ));
            return Ok(self.finish(&request, Vec::new(), report, None, started));
        }

        // Fusion
        let span = self.step(names::FUSE, &request);
        let (lists, graph) = self.ranked_lists(settlements, expansion.results);
        let fused = self.fusion.fuse_for_limit(&lists, graph, request.limit);
        span.end();
        report.fused = fused.len();
        let candidates: Vec<RetrievalResult> = fused.into_iter().map(|c| c.result).collect();

        // Rerank
        let results = match &self.reranker {
            Some(reranker) => {
                request.trace(&format!(
                    "RERANKING: scoring {} fragments",
                    candidates.len()
                ));
                let span = self.step(names::RERANK, &request);
                let outcome = reranker
                    .rerank(
                        &request.query,
                        &request.industry,
                        candidates,
                        request.limit,
                        &request.tenant_id,
                        &request.correlation_id,
                    )
                    .instrument(ragline_observability::rerank_span!(report.fused))
                    .await;
                span.end();
                report.rerank_fallback = outcome.fell_back;
                if outcome.fell_back {
                    self.degraded("rerank", "unusable rerank response", "fused order");
                } else {
                    self.recovered("rerank");
                }
                outcome.results
            }
            None => candidates.into_iter().take(request.limit).collect(),
        };

        // Cache write
        let cache_write = self.cache.as_ref().and_then(|cache| {
            let span = self.step(names::CACHE_WRITE, &request);
            let handle = cache.store(&request.query, &scope, &request.correlation_id, &results);
            span.end();
            handle
        });

        Ok(self.finish(&request, results, report, cache_write, started))
    }

    /// Lexical branch only, at the request limit.
    async fn keyword_only(&self, request: &SearchRequest, started: Instant) -> SearchOutcome {
        request.trace("SEARCH: keyword-only mode, skipping dense retrieval");
        let mut report = SearchReport::new(request.industry.clone());
        let mut results = match self.scheduler.branch(BranchKind::Lexical) {
            Some(lexical) => {
                let query = BranchQuery {
                    query: request.query.clone(),
                    augmented_query: request.query.clone(),
                    tenant_id: request.tenant_id.clone(),
                    correlation_id: request.correlation_id.clone(),
                    limit: request.limit,
                    industry: request.industry.clone(),
                    environment: request.environment,
                    filter: SearchFilter::for_request(
                        request,
                        &self.config.retrieval.shared_tenants,
                    ),
                };
                let span = self.step(names::RETRIEVE, request);
                let settlement = settle(Arc::clone(lexical), &query, self.scheduler.timeout())
                    .instrument(ragline_observability::branch_span!(
                        BranchKind::Lexical,
                        request.limit
                    ))
                    .await;
                span.end();
                self.record_branch_health(request, std::slice::from_ref(&settlement));
                report.branches.push(settlement.report());
                settlement.into_results()
            }
            None => {
                warn!("keyword-only search requested without a lexical branch");
                Vec::new()
            }
        };
        results.truncate(request.limit);
        self.finish(request, results, report, None, started)
    }

    /// The detected industry when it should replace the caller's.
    async fn refine_industry(&self, request: &SearchRequest) -> Option<Industry> {
        let classifier = self.classifier.as_ref()?;
        let refinable = self
            .config
            .domain
            .refinable_industries
            .iter()
            .any(|label| Industry::new(label) == request.industry);
        if !self.config.domain.enabled || !refinable {
            return None;
        }

        request.trace("DOMAIN: classifying query vertical");
        let span = self.step(names::DOMAIN, request);
        let result = classifier
            .classify(&request.query, &request.tenant_id, &request.correlation_id)
            .await;
        span.end();
        match result {
            Ok(industry) if !industry.is_generic() => {
                self.recovered("domain");
                debug!(from = %request.industry, to = %industry, "industry refined");
                Some(industry)
            }
            Ok(_) => {
                self.recovered("domain");
                None
            }
            Err(e) => {
                self.degraded("domain", &e.to_string(), "caller industry");
                None
            }
        }
    }

    fn augmentation_enabled(&self, request: &SearchRequest) -> bool {
        request.intensity == IntensityMode::Deep
    }

    /// Paraphrase the query and search each variation through the primary
    /// dense branch, all under the branch deadline.
    async fn expansion_pass(
        &self,
        query: &BranchQuery,
        request: &SearchRequest,
        augment: bool,
    ) -> ExpansionPass {
        let (Some(augmenter), Some(dense)) = (
            self.augmenter.as_ref(),
            self.scheduler.branch(BranchKind::DensePrimary),
        ) else {
            return ExpansionPass::default();
        };
        if !augment || !augmenter.config().expansion_enabled {
            return ExpansionPass::default();
        }

        request.trace("EXPANSION: searching paraphrased variations");
        let pass = async {
            let variations = augmenter
                .try_expand_query(&request.query, &request.tenant_id, &request.correlation_id)
                .await?;
            let searches = variations.iter().map(|variation| {
                let variation_query = query.with_text(variation, request.limit);
                async move { dense.search(&variation_query).await }
            });
            let results: Vec<RetrievalResult> =
                join_all(searches).await.into_iter().flatten().collect();
            Ok::<_, RagError>((variations.len(), results))
        }
        .instrument(ragline_observability::augment_span!("expansion"));

        let deadline = self.scheduler.timeout();
        let outcome = match tokio::time::timeout(deadline, pass).await {
            Ok(outcome) => outcome,
            Err(_) => Err(RagError::timeout("expansion", deadline)),
        };
        match outcome {
            Ok((variations, results)) => {
                self.recovered("expansion");
                ExpansionPass {
                    variations,
                    results,
                    failed: false,
                }
            }
            Err(e) => {
                self.degraded("expansion", &e.to_string(), "no variations");
                ExpansionPass {
                    failed: true,
                    ..ExpansionPass::default()
                }
            }
        }
    }

    /// Weighted lists in fusion order, plus the graph summary to pin.
    fn ranked_lists(
        &self,
        settlements: Vec<BranchSettlement>,
        expansion: Vec<RetrievalResult>,
    ) -> (Vec<RankedList>, Option<RetrievalResult>) {
        let weights = &self.config.retrieval.weights;
        let mut lists = Vec::with_capacity(settlements.len() + 1);
        let mut graph = None;

        for settlement in settlements {
            let kind = settlement.branch;
            let results = settlement.into_results();
            let weight = match kind {
                BranchKind::DensePrimary => weights.dense_primary,
                BranchKind::DenseMultilingual => weights.dense_multilingual,
                BranchKind::Lexical => weights.lexical,
                BranchKind::GraphContext => {
                    graph = graph.or(results.into_iter().next());
                    continue;
                }
            };
            lists.push(RankedList::new(weight, results));
        }
        if !expansion.is_empty() {
            lists.push(RankedList::new(weights.expansion, expansion));
        }
        (lists, graph)
    }

    fn record_branch_health(&self, request: &SearchRequest, settlements: &[BranchSettlement]) {
        for settlement in settlements {
            let component = settlement.branch.as_str();
            match &settlement.outcome {
                BranchOutcome::Fulfilled(_) => self.recovered(component),
                BranchOutcome::Rejected(reason) => {
                    request.trace(&format!("WARNING: branch {component} failed, continuing"));
                    self.degraded(component, reason, "empty contribution");
                }
                BranchOutcome::TimedOut => {
                    request.trace(&format!("WARNING: branch {component} timed out, continuing"));
                    self.degraded(component, "deadline exceeded", "empty contribution");
                }
            }
        }
    }

    fn finish(
        &self,
        request: &SearchRequest,
        results: Vec<RetrievalResult>,
        mut report: SearchReport,
        cache_write: Option<JoinHandle<()>>,
        started: Instant,
    ) -> SearchOutcome {
        report.elapsed_ms = started.elapsed().as_millis() as u64;
        events::search_completed(
            &request.tenant_id,
            results.len(),
            report.degraded,
            report.elapsed_ms,
        );
        let served_from_cache = matches!(
            report.cache_tier,
            Some(CacheHitTier::L1 | CacheHitTier::L2 | CacheHitTier::L3)
        );
        info!(
            correlation_id = %request.correlation_id,
            results = results.len(),
            cached = served_from_cache,
            "search finished"
        );
        request.trace(&format!("DONE: {} results", results.len()));
        SearchOutcome {
            results,
            report,
            cache_write,
        }
    }

    fn step(&self, name: &str, request: &SearchRequest) -> Box<dyn SpanHandle> {
        self.telemetry.start_span(
            name,
            &[
                ("tenant_id", request.tenant_id.clone()),
                ("correlation_id", request.correlation_id.clone()),
            ],
        )
    }

    fn degraded(&self, component: &str, failure: &str, fallback: &str) {
        if let Ok(mut tracker) = self.degradation.lock() {
            tracker.record(DegradationEvent::now(component, failure, fallback));
        }
    }

    fn recovered(&self, component: &str) {
        if let Ok(mut tracker) = self.degradation.lock() {
            tracker.mark_recovered(component);
        }
    }
}

/// Assembles a [`HybridSearchOrchestrator`] from injected collaborators.
pub struct OrchestratorBuilder {
    config: RaglineConfig,
    branches: Vec<Arc<dyn RetrievalBranch>>,
    augmenter: Option<QueryAugmenter>,
    reranker: Option<LlmReranker>,
    cache: Option<SemanticCache>,
    classifier: Option<Arc<dyn DomainClassifier>>,
    telemetry: Arc<dyn Telemetry>,
}

impl OrchestratorBuilder {
    pub fn new(config: RaglineConfig) -> Self {
        Self {
            config,
            branches: Vec::new(),
            augmenter: None,
            reranker: None,
            cache: None,
            classifier: None,
            telemetry: Arc::new(NoopTelemetry),
        }
    }

    /// Register a branch. Registration order is fusion order.
    pub fn branch(mut self, branch: Arc<dyn RetrievalBranch>) -> Self {
        self.branches.push(branch);
        self
    }

    /// Use `llm` for augmentation, reranking and domain fallback, each
    /// configured from the orchestrator config.
    pub fn llm(mut self, llm: Arc<dyn LlmCompletion>) -> Self {
        self.augmenter = Some(QueryAugmenter::new(
            Arc::clone(&llm),
            self.config.augmentation.clone(),
        ));
        self.reranker = Some(LlmReranker::new(Arc::clone(&llm), self.config.rerank.clone()));
        self.classifier = Some(Arc::new(HeuristicThenLlmClassifier::from_config(
            llm,
            &self.config.domain,
        )));
        self
    }

    pub fn augmenter(mut self, augmenter: QueryAugmenter) -> Self {
        self.augmenter = Some(augmenter);
        self
    }

    pub fn reranker(mut self, reranker: LlmReranker) -> Self {
        self.reranker = Some(reranker);
        self
    }

    pub fn classifier(mut self, classifier: Arc<dyn DomainClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Ignored when caching is disabled in the config.
    pub fn cache(mut self, cache: SemanticCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn telemetry(mut self, telemetry: Arc<dyn Telemetry>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn build(self) -> HybridSearchOrchestrator {
        let timeout = Duration::from_millis(self.config.retrieval.branch_timeout_ms);
        let cache = self.cache.filter(|_| self.config.cache.enabled);
        HybridSearchOrchestrator {
            scheduler: BranchScheduler::new(self.branches, timeout),
            fusion: RankFusionEngine::from_config(&self.config.retrieval),
            augmenter: self.augmenter,
            reranker: self.reranker,
            cache,
            classifier: self.classifier,
            telemetry: self.telemetry,
            degradation: Mutex::new(DegradationTracker::with_capacity(DEGRADATION_HISTORY)),
            config: self.config,
        }
    }
}
