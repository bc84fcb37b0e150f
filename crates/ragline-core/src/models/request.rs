use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::defaults;
use crate::constants::GENERIC_INDUSTRY;
use crate::errors::ValidationError;
use crate::traits::TraceSink;

/// How much work a search is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntensityMode {
    Fast,
    #[default]
    Deep,
    /// Lexical search only. No embeddings, no cache, no rerank.
    KwOnly,
}

/// Deployment environment a document or cache entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Environment {
    #[default]
    Production,
    Staging,
    Development,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Production => "PRODUCTION",
            Environment::Staging => "STAGING",
            Environment::Development => "DEVELOPMENT",
        }
    }

    /// Environments whose documents a search in `self` may see.
    /// Production also sees staged content.
    pub fn visible_environments(&self) -> Vec<Environment> {
        match self {
            Environment::Production => vec![Environment::Production, Environment::Staging],
            other => vec![*other],
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Industry vertical label, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Industry(String);

impl Industry {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(label.as_ref().trim().to_uppercase())
    }

    pub fn generic() -> Self {
        Self(GENERIC_INDUSTRY.to_string())
    }

    pub fn is_generic(&self) -> bool {
        self.0 == GENERIC_INDUSTRY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Industry {
    fn default() -> Self {
        Self::generic()
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single search call. Request-scoped; dropped after the response.
#[derive(Clone)]
pub struct SearchRequest {
    pub query: String,
    pub tenant_id: String,
    /// Opaque trace id. Must parse as a UUID.
    pub correlation_id: String,
    pub industry: Industry,
    pub environment: Environment,
    pub space_id: Option<String>,
    /// Restrict results to one source document.
    pub filename: Option<String>,
    pub limit: usize,
    pub intensity: IntensityMode,
    /// Receives human-readable progress messages.
    pub trace: Option<Arc<dyn TraceSink>>,
}

impl SearchRequest {
    pub fn new(
        query: impl Into<String>,
        tenant_id: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            tenant_id: tenant_id.into(),
            correlation_id: correlation_id.into(),
            industry: Industry::generic(),
            environment: Environment::Production,
            space_id: None,
            filename: None,
            limit: defaults::DEFAULT_LIMIT,
            intensity: IntensityMode::Deep,
            trace: None,
        }
    }

    pub fn with_industry(mut self, industry: Industry) -> Self {
        self.industry = industry;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_space(mut self, space_id: impl Into<String>) -> Self {
        self.space_id = Some(space_id.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_intensity(mut self, intensity: IntensityMode) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_trace(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    /// Reject malformed requests before any collaborator is contacted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.query.trim().is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if self.tenant_id.trim().is_empty() {
            return Err(ValidationError::EmptyTenant);
        }
        if uuid::Uuid::parse_str(&self.correlation_id).is_err() {
            return Err(ValidationError::InvalidCorrelationId {
                value: self.correlation_id.clone(),
            });
        }
        if self.limit == 0 {
            return Err(ValidationError::InvalidLimit { limit: self.limit });
        }
        if self.limit > defaults::MAX_LIMIT {
            return Err(ValidationError::LimitTooLarge {
                limit: self.limit,
                max: defaults::MAX_LIMIT,
            });
        }
        Ok(())
    }

    /// Forward a progress message to the request's sink, if any.
    pub fn trace(&self, message: &str) {
        if let Some(sink) = &self.trace {
            sink.emit(message);
        }
    }
}

impl fmt::Debug for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchRequest")
            .field("query", &self.query)
            .field("tenant_id", &self.tenant_id)
            .field("correlation_id", &self.correlation_id)
            .field("industry", &self.industry)
            .field("environment", &self.environment)
            .field("space_id", &self.space_id)
            .field("filename", &self.filename)
            .field("limit", &self.limit)
            .field("intensity", &self.intensity)
            .field("trace", &self.trace.is_some())
            .finish()
    }
}
