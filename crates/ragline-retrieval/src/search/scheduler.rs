//! Concurrent branch execution with per-branch deadlines.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use ragline_core::models::{BranchKind, BranchOutcome, BranchSettlement};
use ragline_observability::tracing_setup::events;
use tokio::time::Instant;
use tracing::Instrument;

use super::{BranchQuery, RetrievalBranch};

/// Runs every branch concurrently and waits for all of them to settle.
///
/// Each branch gets its own deadline. A branch that misses it is recorded
/// as timed out and its future is dropped, discarding any late result.
/// No branch outcome is ever propagated as an error.
pub struct BranchScheduler {
    branches: Vec<Arc<dyn RetrievalBranch>>,
    timeout: Duration,
}

impl BranchScheduler {
    pub fn new(branches: Vec<Arc<dyn RetrievalBranch>>, timeout: Duration) -> Self {
        Self { branches, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn branch(&self, kind: BranchKind) -> Option<&Arc<dyn RetrievalBranch>> {
        self.branches.iter().find(|b| b.kind() == kind)
    }

    pub fn kinds(&self) -> Vec<BranchKind> {
        self.branches.iter().map(|b| b.kind()).collect()
    }

    /// Settle every branch. Output order matches registration order.
    pub async fn run(&self, query: &BranchQuery) -> Vec<BranchSettlement> {
        let calls = self.branches.iter().map(|branch| {
            let span = ragline_observability::branch_span!(branch.kind(), query.limit);
            settle(Arc::clone(branch), query, self.timeout).instrument(span)
        });
        join_all(calls).await
    }
}

/// Run one branch under `timeout`.
pub(crate) async fn settle(
    branch: Arc<dyn RetrievalBranch>,
    query: &BranchQuery,
    timeout: Duration,
) -> BranchSettlement {
    let started = Instant::now();
    let outcome = match tokio::time::timeout(timeout, branch.try_search(query)).await {
        Ok(Ok(results)) => BranchOutcome::Fulfilled(results),
        Ok(Err(e)) => BranchOutcome::Rejected(e.to_string()),
        Err(_) => BranchOutcome::TimedOut,
    };
    let settlement = BranchSettlement {
        branch: branch.kind(),
        outcome,
        elapsed: started.elapsed(),
    };
    let report = settlement.report();
    events::branch_settled(
        settlement.branch.as_str(),
        &format!("{:?}", report.status),
        report.result_count,
        report.elapsed_ms,
    );
    settlement
}
