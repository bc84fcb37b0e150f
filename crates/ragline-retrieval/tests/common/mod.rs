//! Branch doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use ragline_core::errors::{ExternalServiceError, RagResult, Service};
use ragline_core::models::{BranchKind, RetrievalResult, SearchRequest};
use ragline_retrieval::{BranchQuery, RetrievalBranch};
use test_fixtures::CORRELATION_ID;

pub fn result(kind: BranchKind, text: &str, source: &str) -> RetrievalResult {
    RetrievalResult::new(text, source, kind).with_score(0.5)
}

pub fn request(query: &str) -> SearchRequest {
    SearchRequest::new(query, "t1", CORRELATION_ID)
}

/// Returns fixed results (truncated to the query limit) after an optional delay.
pub struct StaticBranch {
    kind: BranchKind,
    results: Vec<RetrievalResult>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    queries: Mutex<Vec<BranchQuery>>,
}

impl StaticBranch {
    pub fn new(kind: BranchKind, results: Vec<RetrievalResult>) -> Self {
        Self {
            kind,
            results,
            delay: None,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// One result whose text and source derive from `label`.
    pub fn single(kind: BranchKind, label: &str) -> Self {
        Self::new(kind, vec![result(kind, label, &format!("{label}.pdf"))])
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<BranchQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl RetrievalBranch for StaticBranch {
    fn kind(&self) -> BranchKind {
        self.kind
    }

    async fn try_search(&self, query: &BranchQuery) -> RagResult<Vec<RetrievalResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.results.iter().take(query.limit).cloned().collect())
    }
}

/// Always rejects.
pub struct FailingBranch {
    kind: BranchKind,
    calls: AtomicUsize,
}

impl FailingBranch {
    pub fn new(kind: BranchKind) -> Self {
        Self {
            kind,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RetrievalBranch for FailingBranch {
    fn kind(&self) -> BranchKind {
        self.kind
    }

    async fn try_search(&self, _query: &BranchQuery) -> RagResult<Vec<RetrievalResult>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ExternalServiceError::Unavailable {
            service: Service::VectorStore,
            reason: "connection reset".to_string(),
        }
        .into())
    }
}
