use super::{CacheError, ConfigError, ExternalServiceError, RerankError, ValidationError};

/// Top-level error type for the ragline engine.
///
/// Only `Validation` is ever returned from a search call. Every other variant
/// is caught at the step that produced it and turned into that step's fallback.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("external service error: {0}")]
    External(#[from] ExternalServiceError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("rerank error: {0}")]
    Rerank(#[from] RerankError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RagError {
    /// Whether the caller is at fault (the only kind that fails a search).
    pub fn is_validation(&self) -> bool {
        matches!(self, RagError::Validation(_))
    }

    pub fn timeout(operation: impl Into<String>, after: std::time::Duration) -> Self {
        RagError::Timeout {
            operation: operation.into(),
            after_ms: after.as_millis() as u64,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type RagResult<T> = Result<T, RagError>;
