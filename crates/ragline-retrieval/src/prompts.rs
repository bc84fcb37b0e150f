//! Prompt templates sent to the completion collaborator.

use ragline_core::models::{Industry, RetrievalResult};

/// Separator placed between rerank fragments.
pub const FRAGMENT_SEPARATOR: &str = "\n\n---\n\n";

/// Asks for a short hypothetical answer used to steer dense retrieval.
pub fn hyde(query: &str) -> String {
    format!(
        "You are a senior field technician. Write a short, plausible answer to the \
         question below, as it would appear in a technical manual. Do not hedge and \
         do not mention that the answer is hypothetical.\n\n\
         Question: {query}\n\nAnswer:"
    )
}

/// Asks for alternative phrasings, one per line.
pub fn expansion(query: &str, max_variations: usize) -> String {
    format!(
        "Give up to {max_variations} alternative phrasings of the search query below. \
         Use synonyms and technical terminology a manual might use. \
         Answer with one phrasing per line and nothing else.\n\n\
         Query: {query}"
    )
}

/// Asks for a JSON relevance ranking of numbered fragments.
pub fn rerank(
    query: &str,
    industry: &Industry,
    candidates: &[RetrievalResult],
    fragment_chars: usize,
) -> String {
    let fragments = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("[{i}] {}", truncate_chars(&c.text, fragment_chars)))
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR);
    let count = candidates.len();

    format!(
        "You are a technical reviewer for the \"{industry}\" sector. Rank the fragments \
         below by how precisely they answer the query.\n\n\
         Query: \"{query}\"\n\n\
         Fragments:\n{fragments}\n\n\
         There are {count} fragments, numbered 0 to {last}. Return only a JSON array: \
         [{{\"index\": n, \"score\": 0.0-1.0, \"reason\": \"short explanation\"}}]",
        last = count.saturating_sub(1),
    )
}

/// Asks which industry vertical a text belongs to.
pub fn domain(text: &str, labels: &[&str]) -> String {
    let text = truncate_chars(text, 3_000);
    format!(
        "Classify the following text into exactly one of these sectors: {}.\n\
         Answer ONLY with the sector name in upper case.\n\nTEXT:\n{text}",
        labels.join(", ")
    )
}

/// The first `max` characters of `text` (not bytes).
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
