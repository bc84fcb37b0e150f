//! Cache key derivation.

use ragline_core::models::CacheScope;

/// Hex characters of the blake3 digest kept in a key.
const HASH_CHARS: usize = 16;

/// Trim, lowercase, drop punctuation, collapse whitespace.
pub fn normalize_query(query: &str) -> String {
    let lowered = query.trim().to_lowercase();
    let stripped: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncated blake3 hash of the normalized query.
pub fn query_hash(query: &str) -> String {
    let digest = blake3::hash(normalize_query(query).as_bytes());
    digest.to_hex().as_str()[..HASH_CHARS].to_string()
}

/// `{prefix}{tenant}:{environment}:{hash16}`.
pub fn cache_key(prefix: &str, scope: &CacheScope, query: &str) -> String {
    format!(
        "{prefix}{}:{}:{}",
        scope.tenant_id,
        scope.environment.as_str(),
        query_hash(query)
    )
}
