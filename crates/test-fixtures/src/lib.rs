//! Test fixtures for ragline: scripted collaborators and golden JSON scenarios.
//!
//! Every fake counts its calls so tests can assert that a step was (or was
//! not) reached.

pub mod collaborators;
pub mod scenario;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

pub use collaborators::{
    FailingEmbedder, InMemoryKeywordIndex, InMemoryVectorStore, MappedEmbedder, ScriptedLlm,
    StaticCatalog, StaticGraph, StoredChunk,
};
pub use scenario::Scenario;

/// A fixed, valid correlation id for tests.
pub const CORRELATION_ID: &str = "6f1c2a4e-8d3b-4c5a-9e7f-1a2b3c4d5e6f";

/// Root directory of the golden fixture files.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}
