//! Golden end-to-end scenarios.

use serde::Deserialize;

/// A chunk served by one branch in a scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioChunk {
    pub id: String,
    pub text: String,
    pub source: String,
}

/// One request, the fragments each branch returns for it, the scripted
/// relevance-model answer, and the expected final ordering.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub query: String,
    pub tenant_id: String,
    pub limit: usize,
    pub dense_primary: Vec<ScenarioChunk>,
    pub dense_multilingual: Vec<ScenarioChunk>,
    pub lexical: Vec<ScenarioChunk>,
    pub graph_summary: Option<String>,
    pub hyde_answer: String,
    pub rerank_response: String,
    pub expected_sources: Vec<String>,
}
