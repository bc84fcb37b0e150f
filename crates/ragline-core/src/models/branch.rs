use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{BranchKind, RetrievalResult};

/// How a branch call settled.
#[derive(Debug, Clone, PartialEq)]
pub enum BranchOutcome {
    Fulfilled(Vec<RetrievalResult>),
    Rejected(String),
    /// The deadline elapsed. Any late result was discarded.
    TimedOut,
}

/// Outcome tag, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchStatus {
    Fulfilled,
    Rejected,
    TimedOut,
}

/// One branch's settled outcome, as collected by the scheduler.
#[derive(Debug, Clone)]
pub struct BranchSettlement {
    pub branch: BranchKind,
    pub outcome: BranchOutcome,
    pub elapsed: Duration,
}

impl BranchSettlement {
    pub fn status(&self) -> BranchStatus {
        match self.outcome {
            BranchOutcome::Fulfilled(_) => BranchStatus::Fulfilled,
            BranchOutcome::Rejected(_) => BranchStatus::Rejected,
            BranchOutcome::TimedOut => BranchStatus::TimedOut,
        }
    }

    pub fn report(&self) -> BranchReport {
        let (result_count, error) = match &self.outcome {
            BranchOutcome::Fulfilled(results) => (results.len(), None),
            BranchOutcome::Rejected(reason) => (0, Some(reason.clone())),
            BranchOutcome::TimedOut => (0, None),
        };
        BranchReport {
            branch: self.branch,
            status: self.status(),
            elapsed_ms: self.elapsed.as_millis() as u64,
            result_count,
            error,
        }
    }

    /// Results of a fulfilled branch; empty otherwise.
    pub fn into_results(self) -> Vec<RetrievalResult> {
        match self.outcome {
            BranchOutcome::Fulfilled(results) => results,
            _ => Vec::new(),
        }
    }
}

/// Serializable per-branch diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchReport {
    pub branch: BranchKind,
    pub status: BranchStatus,
    pub elapsed_ms: u64,
    pub result_count: usize,
    pub error: Option<String>,
}
