//! # ragline-core
//!
//! Foundation crate for the ragline hybrid retrieval engine.
//! Defines request/result types, collaborator traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod similarity;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RaglineConfig;
pub use errors::{RagError, RagResult};
pub use models::{
    BranchKind, Environment, Industry, IntensityMode, RetrievalResult, SearchFilter,
    SearchRequest,
};
