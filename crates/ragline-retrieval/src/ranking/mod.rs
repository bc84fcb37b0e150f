//! Relevance-model reranking of the fused shortlist.

mod reranker;

pub use reranker::{parse_response, LlmReranker, RerankEntry, RerankOutcome};
