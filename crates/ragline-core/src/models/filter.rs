use serde::{Deserialize, Serialize};

use super::{Environment, HitMetadata, Industry, SearchRequest};

/// Industry restriction applied by every branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndustryConstraint {
    /// `GENERIC` searches see every vertical.
    Any,
    /// The named vertical, plus generic and unlabelled documents.
    OneOf(Industry),
}

impl IndustryConstraint {
    pub fn from_industry(industry: &Industry) -> Self {
        if industry.is_generic() {
            IndustryConstraint::Any
        } else {
            IndustryConstraint::OneOf(industry.clone())
        }
    }

    pub fn matches(&self, industry: Option<&Industry>) -> bool {
        match (self, industry) {
            (IndustryConstraint::Any, _) => true,
            (IndustryConstraint::OneOf(_), None) => true,
            (IndustryConstraint::OneOf(wanted), Some(actual)) => {
                actual == wanted || actual.is_generic()
            }
        }
    }
}

/// Scope every branch search is restricted to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// The requesting tenant plus the shared tenants.
    pub tenant_ids: Vec<String>,
    pub environments: Vec<Environment>,
    pub industry: IndustryConstraint,
    pub space_id: Option<String>,
    pub filename: Option<String>,
}

impl SearchFilter {
    pub fn new(
        tenant_id: &str,
        shared_tenants: &[String],
        environment: Environment,
        industry: &Industry,
    ) -> Self {
        let mut tenant_ids: Vec<String> = shared_tenants.to_vec();
        if !tenant_ids.iter().any(|t| t == tenant_id) {
            tenant_ids.push(tenant_id.to_string());
        }
        Self {
            tenant_ids,
            environments: environment.visible_environments(),
            industry: IndustryConstraint::from_industry(industry),
            space_id: None,
            filename: None,
        }
    }

    /// Build the filter for a request, using its (possibly refined) industry.
    pub fn for_request(request: &SearchRequest, shared_tenants: &[String]) -> Self {
        let mut filter = Self::new(
            &request.tenant_id,
            shared_tenants,
            request.environment,
            &request.industry,
        );
        filter.space_id = request.space_id.clone();
        filter.filename = request.filename.clone();
        filter
    }

    /// Whether a stored chunk with `metadata` from `source` falls inside this scope.
    pub fn matches(&self, source: &str, metadata: &HitMetadata) -> bool {
        self.tenant_ids.iter().any(|t| *t == metadata.tenant_id)
            && self.environments.contains(&metadata.environment)
            && self.industry.matches(metadata.industry.as_ref())
            && self
                .space_id
                .as_ref()
                .map_or(true, |s| metadata.space_id.as_deref() == Some(s.as_str()))
            && self.filename.as_ref().map_or(true, |f| f == source)
    }
}
