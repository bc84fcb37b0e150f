/// Caller errors, rejected before any collaborator is contacted.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("query must not be empty")]
    EmptyQuery,

    #[error("tenant id must not be empty")]
    EmptyTenant,

    #[error("correlation id is not a valid UUID: {value}")]
    InvalidCorrelationId { value: String },

    #[error("limit must be greater than 0, got {limit}")]
    InvalidLimit { limit: usize },

    #[error("limit must be at most {max}, got {limit}")]
    LimitTooLarge { limit: usize, max: usize },
}
