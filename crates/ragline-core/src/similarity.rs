//! Vector similarity helpers shared by stores and cache tiers.

/// Cosine similarity. Zero for empty, mismatched or zero-norm vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Maximal marginal relevance selection.
///
/// Greedily picks up to `k` indices into `candidates`, each maximizing
/// `lambda * sim(query, c) - (1 - lambda) * max(sim(c, selected))`.
/// Ties resolve to the lower index, so the output is deterministic.
pub fn mmr_select(query: &[f32], candidates: &[Vec<f32>], k: usize, lambda: f64) -> Vec<usize> {
    let relevance: Vec<f64> = candidates
        .iter()
        .map(|c| cosine_similarity(query, c))
        .collect();
    let mut selected: Vec<usize> = Vec::with_capacity(k.min(candidates.len()));
    let mut remaining: Vec<usize> = (0..candidates.len()).collect();

    while selected.len() < k && !remaining.is_empty() {
        let mut best_pos = 0;
        let mut best_score = f64::NEG_INFINITY;
        for (pos, &idx) in remaining.iter().enumerate() {
            let redundancy = selected
                .iter()
                .map(|&s| cosine_similarity(&candidates[idx], &candidates[s]))
                .fold(0.0f64, f64::max);
            let score = lambda * relevance[idx] - (1.0 - lambda) * redundancy;
            if score > best_score {
                best_score = score;
                best_pos = pos;
            }
        }
        selected.push(remaining.remove(best_pos));
    }
    selected
}
