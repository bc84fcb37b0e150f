//! # ragline-retrieval
//!
//! The query engine. Concurrent fan-out over independent retrieval branches,
//! weighted reciprocal rank fusion, relevance-model reranking, all behind a
//! 3-tier semantic cache.
//!
//! ## Architecture
//!
//! ```text
//! HybridSearchOrchestrator
//! ├── SemanticCache (L1 → L3 → L2)
//! ├── DomainClassifier
//! │   ├── KeywordDomainClassifier (word-boundary keyword counts)
//! │   └── LlmDomainClassifier (fallback)
//! ├── QueryAugmenter
//! │   ├── HyDE (hypothetical answer)
//! │   └── Paraphrase expansion
//! ├── BranchScheduler (settle-all, per-branch deadline)
//! │   ├── DensePrimarySearch (MMR + context enrichment)
//! │   ├── DenseMultilingualSearch
//! │   ├── LexicalSearch (BM25)
//! │   └── GraphContextSearch
//! ├── RankFusionEngine (weighted RRF, prefix dedup, graph pinned)
//! ├── LlmReranker (JSON ranking, fused-order fallback)
//! └── budget
//!     └── pack_context (history + chunks under a token budget)
//! ```

pub mod budget;
pub mod domain;
pub mod engine;
pub mod expansion;
pub mod prompts;
pub mod ranking;
pub mod search;

pub use engine::{HybridSearchOrchestrator, OrchestratorBuilder, SearchOutcome};
pub use expansion::QueryAugmenter;
pub use ranking::LlmReranker;
pub use search::{BranchQuery, BranchScheduler, RankFusionEngine, RetrievalBranch};
