//! # ragline-cache
//!
//! 3-tier cache in front of the retrieval pipeline.
//!
//! ## Architecture
//!
//! ```text
//! SemanticCache
//! ├── key (normalize → blake3 → prefix:tenant:env:hash16)
//! ├── L1MemoryCache (moka, idle TTL)
//! ├── L3SemanticCache (SemanticStore, cosine > threshold, scope re-check)
//! ├── L2KvCache (CacheStore, JSON + TTL)
//! └── memory (InMemoryCacheStore, InMemorySemanticStore)
//! ```
//!
//! Read order: L1 → L3 → L2; a lower-tier hit is promoted to L1.
//! Writes go to L1 inline and to L2/L3 in a detached task.

pub mod coordinator;
pub mod key;
pub mod l1_memory;
pub mod l2_kv;
pub mod l3_semantic;
pub mod memory;

pub use coordinator::SemanticCache;
pub use l1_memory::L1MemoryCache;
pub use l2_kv::L2KvCache;
pub use l3_semantic::L3SemanticCache;
pub use memory::{InMemoryCacheStore, InMemorySemanticStore};
pub use ragline_core::models::CacheHitTier;
