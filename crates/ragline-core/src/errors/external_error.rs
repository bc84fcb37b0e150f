use std::fmt;

use serde::{Deserialize, Serialize};

/// The collaborator an external call was addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    Embedding,
    VectorStore,
    DocumentCatalog,
    KeywordIndex,
    Graph,
    Llm,
    DomainClassifier,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Embedding => "embedding",
            Service::VectorStore => "vector_store",
            Service::DocumentCatalog => "document_catalog",
            Service::KeywordIndex => "keyword_index",
            Service::Graph => "graph",
            Service::Llm => "llm",
            Service::DomainClassifier => "domain_classifier",
        };
        f.write_str(name)
    }
}

/// A call to an injected collaborator failed.
#[derive(Debug, thiserror::Error)]
pub enum ExternalServiceError {
    #[error("{service} unavailable: {reason}")]
    Unavailable { service: Service, reason: String },

    #[error("{service} call failed: {reason}")]
    CallFailed { service: Service, reason: String },

    #[error("{service} returned a malformed response: {reason}")]
    MalformedResponse { service: Service, reason: String },
}

impl ExternalServiceError {
    pub fn service(&self) -> Service {
        match self {
            ExternalServiceError::Unavailable { service, .. }
            | ExternalServiceError::CallFailed { service, .. }
            | ExternalServiceError::MalformedResponse { service, .. } => *service,
        }
    }
}
