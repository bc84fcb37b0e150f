// Single source of truth for all default values.

// --- Request ---
pub const DEFAULT_LIMIT: usize = 4;
pub const MAX_LIMIT: usize = 1_000;

// --- Retrieval ---
pub const DEFAULT_BRANCH_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_FETCH_MULTIPLIER: usize = 3;
pub const DEFAULT_SHORTLIST_SIZE: usize = 15;
pub const DEFAULT_RRF_K: u32 = 60;
pub const DEFAULT_DEDUP_PREFIX_CHARS: usize = 150;
pub const DEFAULT_WEIGHT_DENSE_PRIMARY: f64 = 1.0;
pub const DEFAULT_WEIGHT_DENSE_MULTILINGUAL: f64 = 1.2;
pub const DEFAULT_WEIGHT_LEXICAL: f64 = 1.5;
pub const DEFAULT_WEIGHT_EXPANSION: f64 = 0.8;
pub const DEFAULT_MMR_FETCH_K: usize = 20;
pub const DEFAULT_MMR_LAMBDA: f64 = 0.5;
pub const DEFAULT_DENSE_SCORE: f64 = 0.85;
pub const DEFAULT_SHARED_TENANTS: &[&str] = &["abd_global", "global"];

// --- Augmentation ---
pub const DEFAULT_HYDE_ENABLED: bool = true;
pub const DEFAULT_EXPANSION_ENABLED: bool = true;
pub const DEFAULT_AUGMENT_TEMPERATURE: f32 = 0.1;
pub const DEFAULT_MAX_VARIATIONS: usize = 3;
pub const DEFAULT_AUGMENT_TIMEOUT_MS: u64 = 10_000;

// --- Rerank ---
pub const DEFAULT_RERANK_ENABLED: bool = true;
pub const DEFAULT_RERANK_FRAGMENT_CHARS: usize = 600;
pub const DEFAULT_RERANK_MAX_RETRIES: u32 = 0;
pub const DEFAULT_RERANK_RETRY_BACKOFF_MS: u64 = 250;
pub const DEFAULT_RERANK_TEMPERATURE: f32 = 0.0;
pub const DEFAULT_RERANK_TIMEOUT_MS: u64 = 10_000;

// --- Cache ---
pub const DEFAULT_CACHE_ENABLED: bool = true;
pub const DEFAULT_L1_CAPACITY: u64 = 500;
pub const DEFAULT_L1_TTL_SECS: u64 = 300; // 5 minutes
pub const DEFAULT_L2_TTL_SECS: u64 = 86_400; // 24 hours
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.96;
pub const DEFAULT_L3_CANDIDATES: usize = 10;
pub const DEFAULT_CACHE_KEY_PREFIX: &str = "rag_cache:";
pub const DEFAULT_CACHE_LOOKUP_TIMEOUT_MS: u64 = 2_000;

// --- Domain ---
pub const DEFAULT_DOMAIN_ENABLED: bool = true;
pub const DEFAULT_REFINABLE_INDUSTRIES: &[&str] = &["ELEVATORS", "GENERIC"];
pub const DEFAULT_DOMAIN_LLM_FALLBACK: bool = true;
pub const DEFAULT_DOMAIN_LLM_RETRIES: u32 = 3;
pub const DEFAULT_DOMAIN_LLM_TIMEOUT_MS: u64 = 10_000;

// --- Context packing ---
pub const DEFAULT_CONTEXT_MAX_TOKENS: usize = 3_000;
pub const DEFAULT_HISTORY_MAX_TOKENS: usize = 800;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
pub const DEFAULT_TRACE_MESSAGES: bool = true;
