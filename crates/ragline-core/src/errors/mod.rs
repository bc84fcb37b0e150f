mod cache_error;
mod config_error;
mod external_error;
mod rag_error;
mod rerank_error;
mod validation_error;

pub use cache_error::CacheError;
pub use config_error::ConfigError;
pub use external_error::{ExternalServiceError, Service};
pub use rag_error::{RagError, RagResult};
pub use rerank_error::RerankError;
pub use validation_error::ValidationError;
