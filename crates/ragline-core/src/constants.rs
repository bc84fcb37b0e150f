/// Industry label that matches every vertical.
pub const GENERIC_INDUSTRY: &str = "GENERIC";

/// Verticals the domain classifier may answer with.
pub const KNOWN_INDUSTRIES: &[&str] = &[
    "ELEVATORS",
    "LEGAL",
    "BANKING",
    "INSURANCE",
    "IT",
    "MEDICAL",
    "GENERIC",
    "REAL_ESTATE",
];

/// Source identifier stamped on knowledge-graph summaries.
pub const GRAPH_SOURCE: &str = "KNOWLEDGE_GRAPH";
/// Content type stamped on knowledge-graph summaries.
pub const GRAPH_CONTENT_TYPE: &str = "GRAPH_CONTEXT";
/// Model id stamped on knowledge-graph summaries.
pub const GRAPH_MODEL: &str = "NEO4J";
/// Reserved fusion score that pins the graph summary above every fused candidate.
pub const GRAPH_PINNED_SCORE: f64 = 999.0;

/// Marker joining the original query and the hypothetical answer.
pub const HYDE_MARKER: &str = "[HYDE]:";

/// Trace annotation emitted when a request completes in degraded mode.
pub const DEGRADED_ANNOTATION: &str = "DEGRADED";

/// Rough characters-per-token ratio used when packing context.
pub const CHARS_PER_TOKEN: usize = 4;
