/// Relevance-model reranking failures.
#[derive(Debug, thiserror::Error)]
pub enum RerankError {
    #[error("rerank call failed: {reason}")]
    CallFailed { reason: String },

    #[error("rerank response is not a JSON ranking: {reason}")]
    Unparseable { reason: String },

    #[error("rerank response contained no valid entries")]
    NoValidEntries,
}
