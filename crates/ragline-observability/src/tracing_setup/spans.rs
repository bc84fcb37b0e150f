//! Span definitions per pipeline step: search, branch, cache, augmentation, rerank.

/// Create a search span.
#[macro_export]
macro_rules! search_span {
    ($tenant:expr, $correlation:expr, $intensity:expr) => {
        tracing::info_span!(
            "ragline.search",
            tenant_id = %$tenant,
            correlation_id = %$correlation,
            intensity = ?$intensity
        )
    };
}

/// Create a branch span.
#[macro_export]
macro_rules! branch_span {
    ($branch:expr, $limit:expr) => {
        tracing::info_span!("ragline.branch", branch = %$branch, limit = $limit)
    };
}

/// Create a cache span.
#[macro_export]
macro_rules! cache_span {
    ($operation:expr, $key:expr) => {
        tracing::debug_span!("ragline.cache", operation = %$operation, key = %$key)
    };
}

/// Create an augmentation span.
#[macro_export]
macro_rules! augment_span {
    ($kind:expr) => {
        tracing::info_span!("ragline.augment", kind = %$kind)
    };
}

/// Create a rerank span.
#[macro_export]
macro_rules! rerank_span {
    ($candidates:expr) => {
        tracing::info_span!("ragline.rerank", candidates = $candidates)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const SEARCH: &str = "ragline.search";
    pub const VALIDATE: &str = "ragline.validate";
    pub const CACHE_LOOKUP: &str = "ragline.cache_lookup";
    pub const DOMAIN: &str = "ragline.domain";
    pub const HYDE: &str = "ragline.hyde";
    pub const RETRIEVE: &str = "ragline.retrieve";
    pub const FUSE: &str = "ragline.fuse";
    pub const RERANK: &str = "ragline.rerank";
    pub const CACHE_WRITE: &str = "ragline.cache_write";
}
