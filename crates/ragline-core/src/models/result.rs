use std::fmt;

use serde::{Deserialize, Serialize};

/// The retrieval strategy that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchKind {
    DensePrimary,
    DenseMultilingual,
    Lexical,
    GraphContext,
}

impl BranchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchKind::DensePrimary => "dense_primary",
            BranchKind::DenseMultilingual => "dense_multilingual",
            BranchKind::Lexical => "lexical",
            BranchKind::GraphContext => "graph_context",
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A figure, table or attachment linked to a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedAsset {
    pub kind: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One retrieved text fragment.
///
/// Traceable to exactly one source document (`source`) and one branch (`branch`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub text: String,
    pub source: String,
    /// Strategy-defined scale. Rerank replaces it with a 0..1 relevance.
    pub score: Option<f64>,
    pub content_type: String,
    pub model: String,
    pub branch: BranchKind,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub approx_page: Option<u32>,
    #[serde(default)]
    pub chunk_type: Option<String>,
    #[serde(default)]
    pub related_assets: Vec<RelatedAsset>,
    #[serde(default)]
    pub asset_url: Option<String>,
    #[serde(default)]
    pub rerank_reason: Option<String>,
}

impl RetrievalResult {
    pub fn new(text: impl Into<String>, source: impl Into<String>, branch: BranchKind) -> Self {
        Self {
            text: text.into(),
            source: source.into(),
            score: None,
            content_type: "TEXT".to_string(),
            model: String::new(),
            branch,
            language: None,
            approx_page: None,
            chunk_type: None,
            related_assets: Vec::new(),
            asset_url: None,
            rerank_reason: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

/// A result plus its accumulated fusion score.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate {
    pub result: RetrievalResult,
    pub fusion_score: f64,
}
