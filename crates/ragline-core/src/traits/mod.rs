//! Collaborator interfaces injected into the engine.
//!
//! Async traits go through `async_trait` so they can be held as `Arc<dyn Trait>`.

mod cache_store;
mod catalog;
mod classifier;
mod embedding;
mod graph;
mod keyword;
mod llm;
mod telemetry;
mod vector_store;

pub use cache_store::{CacheStore, SemanticMatch, SemanticStore};
pub use catalog::{DocumentCatalog, DocumentContext};
pub use classifier::DomainClassifier;
pub use embedding::EmbeddingProvider;
pub use graph::GraphService;
pub use keyword::KeywordIndex;
pub use llm::{GenerationOptions, LlmCompletion};
pub use telemetry::{SpanHandle, Telemetry, TraceSink};
pub use vector_store::{Selection, VectorStore};
