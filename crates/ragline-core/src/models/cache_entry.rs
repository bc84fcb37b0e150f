use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Environment, RetrievalResult};

/// The (tenant, environment) pair a cache entry is visible to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheScope {
    pub tenant_id: String,
    pub environment: Environment,
}

impl CacheScope {
    pub fn new(tenant_id: impl Into<String>, environment: Environment) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            environment,
        }
    }
}

/// A cached search outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub query: String,
    pub embedding: Vec<f32>,
    pub results: Vec<RetrievalResult>,
    pub scope: CacheScope,
    pub created_at: DateTime<Utc>,
    pub ttl_secs: Option<u64>,
}

/// Which cache tier served a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheHitTier {
    L1,
    L2,
    L3,
    Miss,
}
