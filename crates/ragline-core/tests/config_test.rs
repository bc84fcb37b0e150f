use std::collections::HashMap;

use ragline_core::config::*;
use ragline_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = RaglineConfig::from_toml("").unwrap();

    // Retrieval defaults
    assert_eq!(config.retrieval.branch_timeout_ms, 15_000);
    assert_eq!(config.retrieval.fetch_multiplier, 3);
    assert_eq!(config.retrieval.shortlist_size, 15);
    assert_eq!(config.retrieval.rrf_k, 60);
    assert_eq!(config.retrieval.dedup_prefix_chars, 150);
    assert_eq!(config.retrieval.weights.dense_primary, 1.0);
    assert_eq!(config.retrieval.weights.dense_multilingual, 1.2);
    assert_eq!(config.retrieval.weights.lexical, 1.5);
    assert_eq!(config.retrieval.weights.expansion, 0.8);
    assert_eq!(config.retrieval.mmr_fetch_k, 20);
    assert_eq!(config.retrieval.shared_tenants, vec!["abd_global", "global"]);

    // Augmentation defaults
    assert!(config.augmentation.hyde_enabled);
    assert!((config.augmentation.temperature - 0.1).abs() < f32::EPSILON);

    // Rerank defaults
    assert_eq!(config.rerank.fragment_chars, 600);
    assert_eq!(config.rerank.max_retries, 0);
    assert_eq!(config.rerank.call_timeout_ms, 10_000);

    // Cache defaults
    assert_eq!(config.cache.l1_capacity, 500);
    assert_eq!(config.cache.l1_ttl_secs, 300);
    assert_eq!(config.cache.l2_ttl_secs, 86_400);
    assert_eq!(config.cache.similarity_threshold, 0.96);
    assert_eq!(config.cache.l3_candidates, 10);
    assert_eq!(config.cache.lookup_timeout_ms, 2_000);

    // Domain defaults
    assert_eq!(config.domain.refinable_industries, vec!["ELEVATORS", "GENERIC"]);

    // Observability defaults
    assert_eq!(config.observability.log_level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[retrieval]
branch_timeout_ms = 5000

[retrieval.weights]
lexical = 2.0

[cache]
similarity_threshold = 0.9
"#;
    let config = RaglineConfig::from_toml(toml).unwrap();
    assert_eq!(config.retrieval.branch_timeout_ms, 5000);
    assert_eq!(config.retrieval.weights.lexical, 2.0);
    // Non-overridden fields keep defaults
    assert_eq!(config.retrieval.weights.dense_multilingual, 1.2);
    assert_eq!(config.cache.similarity_threshold, 0.9);
    assert_eq!(config.cache.l1_capacity, 500);
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let err = RaglineConfig::from_toml("[retrieval\nrrf_k = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn env_overrides_apply_and_ignore_garbage() {
    let vars: HashMap<&str, &str> = [
        ("RAGLINE_BRANCH_TIMEOUT_MS", "2500"),
        ("RAGLINE_RRF_K", "not-a-number"),
        ("RAGLINE_RERANK_MAX_RETRIES", "2"),
        ("RAGLINE_LOG_LEVEL", "debug"),
    ]
    .into_iter()
    .collect();

    let mut config = RaglineConfig::default();
    config.apply_env_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(config.retrieval.branch_timeout_ms, 2500);
    assert_eq!(config.retrieval.rrf_k, 60);
    assert_eq!(config.rerank.max_retries, 2);
    assert_eq!(config.observability.log_level, "debug");
}

#[test]
fn validation_rejects_out_of_range_values() {
    let mut config = RaglineConfig::default();
    config.cache.similarity_threshold = 1.5;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed { ref field, .. }) if field == "cache.similarity_threshold"
    ));

    let mut config = RaglineConfig::default();
    config.retrieval.branch_timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = RaglineConfig::default();
    config.retrieval.weights.expansion = -1.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[test]
fn zero_rrf_k_is_rejected() {
    let mut config = RaglineConfig::default();
    config.apply_env_overrides_from(|key| (key == "RAGLINE_RRF_K").then(|| "0".to_string()));
    assert_eq!(config.retrieval.rrf_k, 0);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed { ref field, .. }) if field == "retrieval.rrf_k"
    ));
}

#[test]
fn zero_collaborator_deadlines_are_rejected() {
    let mut config = RaglineConfig::default();
    config.rerank.call_timeout_ms = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed { ref field, .. }) if field == "rerank.call_timeout_ms"
    ));

    let mut config = RaglineConfig::default();
    config.cache.lookup_timeout_ms = 0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationFailed { ref field, .. }) if field == "cache.lookup_timeout_ms"
    ));
}

#[test]
fn load_without_file_uses_defaults() {
    let config = RaglineConfig::load(None).unwrap();
    assert_eq!(config.retrieval.shortlist_size, defaults::DEFAULT_SHORTLIST_SIZE);
}

#[test]
fn load_missing_file_is_file_not_found() {
    let err = RaglineConfig::load(Some(std::path::Path::new("/nonexistent/ragline.toml")))
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}
