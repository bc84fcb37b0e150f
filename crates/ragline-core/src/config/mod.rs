mod augmentation_config;
mod cache_config;
pub mod defaults;
mod domain_config;
mod observability_config;
mod ragline_config;
mod rerank_config;
mod retrieval_config;

pub use augmentation_config::AugmentationConfig;
pub use cache_config::CacheConfig;
pub use domain_config::DomainConfig;
pub use observability_config::ObservabilityConfig;
pub use ragline_config::RaglineConfig;
pub use rerank_config::RerankConfig;
pub use retrieval_config::{FusionWeights, RetrievalConfig};
