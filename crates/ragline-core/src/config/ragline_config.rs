//! Top-level ragline configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{
    AugmentationConfig, CacheConfig, DomainConfig, ObservabilityConfig, RerankConfig,
    RetrievalConfig,
};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`RAGLINE_*`)
/// 2. Config file (`ragline.toml`)
/// 3. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RaglineConfig {
    pub retrieval: RetrievalConfig,
    pub augmentation: AugmentationConfig,
    pub rerank: RerankConfig,
    pub cache: CacheConfig,
    pub domain: DomainConfig,
    pub observability: ObservabilityConfig,
}

impl RaglineConfig {
    /// Load configuration from an optional TOML file, apply `RAGLINE_*`
    /// environment overrides, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply overrides read through `lookup`. Unparseable values are ignored.
    pub fn apply_env_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("RAGLINE_BRANCH_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.retrieval.branch_timeout_ms = v;
        }
        if let Some(v) = lookup("RAGLINE_RRF_K").and_then(|v| v.parse().ok()) {
            self.retrieval.rrf_k = v;
        }
        if let Some(v) = lookup("RAGLINE_SHORTLIST_SIZE").and_then(|v| v.parse().ok()) {
            self.retrieval.shortlist_size = v;
        }
        if let Some(v) = lookup("RAGLINE_CACHE_SIMILARITY_THRESHOLD").and_then(|v| v.parse().ok())
        {
            self.cache.similarity_threshold = v;
        }
        if let Some(v) = lookup("RAGLINE_L2_TTL_SECS").and_then(|v| v.parse().ok()) {
            self.cache.l2_ttl_secs = v;
        }
        if let Some(v) = lookup("RAGLINE_CACHE_ENABLED").and_then(|v| v.parse().ok()) {
            self.cache.enabled = v;
        }
        if let Some(v) = lookup("RAGLINE_RERANK_MAX_RETRIES").and_then(|v| v.parse().ok()) {
            self.rerank.max_retries = v;
        }
        if let Some(v) = lookup("RAGLINE_LOG_LEVEL") {
            self.observability.log_level = v;
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &str, value: u64) -> Result<(), ConfigError> {
            if value == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
            Ok(())
        }

        positive("retrieval.branch_timeout_ms", self.retrieval.branch_timeout_ms)?;
        positive("retrieval.rrf_k", u64::from(self.retrieval.rrf_k))?;
        positive("retrieval.fetch_multiplier", self.retrieval.fetch_multiplier as u64)?;
        positive("retrieval.shortlist_size", self.retrieval.shortlist_size as u64)?;
        positive("retrieval.dedup_prefix_chars", self.retrieval.dedup_prefix_chars as u64)?;
        positive("retrieval.mmr_fetch_k", self.retrieval.mmr_fetch_k as u64)?;
        positive("augmentation.call_timeout_ms", self.augmentation.call_timeout_ms)?;
        positive("rerank.fragment_chars", self.rerank.fragment_chars as u64)?;
        positive("rerank.call_timeout_ms", self.rerank.call_timeout_ms)?;
        positive("cache.l1_capacity", self.cache.l1_capacity)?;
        positive("cache.l1_ttl_secs", self.cache.l1_ttl_secs)?;
        positive("cache.l2_ttl_secs", self.cache.l2_ttl_secs)?;
        positive("cache.l3_candidates", self.cache.l3_candidates as u64)?;
        positive("cache.lookup_timeout_ms", self.cache.lookup_timeout_ms)?;

        if !(0.0..=1.0).contains(&self.retrieval.mmr_lambda) {
            return Err(ConfigError::ValidationFailed {
                field: "retrieval.mmr_lambda".to_string(),
                message: "must be between 0.0 and 1.0".to_string(),
            });
        }
        let threshold = self.cache.similarity_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::ValidationFailed {
                field: "cache.similarity_threshold".to_string(),
                message: "must be in (0.0, 1.0]".to_string(),
            });
        }
        let w = &self.retrieval.weights;
        for (field, value) in [
            ("retrieval.weights.dense_primary", w.dense_primary),
            ("retrieval.weights.dense_multilingual", w.dense_multilingual),
            ("retrieval.weights.lexical", w.lexical),
            ("retrieval.weights.expansion", w.expansion),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("weight must be a non-negative number, got {value}"),
                });
            }
        }
        if self.cache.key_prefix.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "cache.key_prefix".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
