use serde::{Deserialize, Serialize};

use super::{Environment, Industry, RelatedAsset};

/// Scoping and provenance metadata a store returns with each hit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitMetadata {
    pub tenant_id: String,
    pub environment: Environment,
    /// `None` means the document was ingested without an industry.
    pub industry: Option<Industry>,
    pub space_id: Option<String>,
    /// Set when the hit is a child chunk.
    pub parent_id: Option<String>,
    pub language: Option<String>,
    pub approx_page: Option<u32>,
    pub chunk_type: Option<String>,
    pub asset_url: Option<String>,
    pub related_assets: Vec<RelatedAsset>,
}

/// A ranked hit from a vector store or keyword index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    pub id: String,
    pub text: String,
    pub source: String,
    pub score: Option<f64>,
    #[serde(default)]
    pub metadata: HitMetadata,
}
