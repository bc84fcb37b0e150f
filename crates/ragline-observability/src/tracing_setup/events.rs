//! Structured log events for key pipeline operations.
//!
//! Each function emits a `tracing` event with structured fields.

/// Log a settled branch.
pub fn branch_settled(branch: &str, status: &str, results: usize, elapsed_ms: u64) {
    tracing::info!(
        event = "branch_settled",
        branch = %branch,
        status = %status,
        results = results,
        elapsed_ms = elapsed_ms,
        "branch settled"
    );
}

/// Log a cache hit.
pub fn cache_hit(tier: &str, key: &str) {
    tracing::debug!(event = "cache_hit", tier = %tier, key = %key, "cache hit");
}

/// Log a failed background cache write.
pub fn cache_write_failed(tier: &str, key: &str, reason: &str) {
    tracing::warn!(
        event = "cache_write_failed",
        tier = %tier,
        key = %key,
        reason = %reason,
        "cache write failed"
    );
}

/// Log a degradation trigger event.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a rerank fallback to fused order.
pub fn rerank_fallback(candidates: usize, reason: &str) {
    tracing::warn!(
        event = "rerank_fallback",
        candidates = candidates,
        reason = %reason,
        "rerank fell back to fused order"
    );
}

/// Log a completed search.
pub fn search_completed(tenant_id: &str, results: usize, degraded: bool, elapsed_ms: u64) {
    tracing::info!(
        event = "search_completed",
        tenant_id = %tenant_id,
        results = results,
        degraded = degraded,
        elapsed_ms = elapsed_ms,
        "search completed"
    );
}
