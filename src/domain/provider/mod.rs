//! Evidence providers
//!
//! The two interchangeable evidence paths behind the router, bound into a
//! registry indexed by a closed role enum. Each role holds exactly one typed
//! implementation, so a routing decision can never miss its provider.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::error::PipelineError;
use crate::domain::pipeline::{Evidence, Query, RouteDecision};

/// Role a provider fills in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderRole {
    /// Nearest-neighbor lookup against the precomputed knowledge index
    Retrieval,
    /// Live web search
    WebSearch,
}

impl ProviderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retrieval => "retrieval",
            Self::WebSearch => "web_search",
        }
    }
}

/// Trait for services producing ranked evidence for a query
///
/// Implementations only read the query; ordering of the returned sequence is
/// meaningful and preserved downstream.
#[async_trait]
pub trait EvidenceProvider: Send + Sync + Debug {
    fn role(&self) -> ProviderRole;

    async fn provide(&self, query: &Query) -> Result<Vec<Evidence>, PipelineError>;
}

/// Registry binding each provider role to its single implementation
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    retrieval: Arc<dyn EvidenceProvider>,
    web_search: Arc<dyn EvidenceProvider>,
}

impl ProviderRegistry {
    /// Both roles are required up front; there is no partial registry.
    pub fn new(retrieval: Arc<dyn EvidenceProvider>, web_search: Arc<dyn EvidenceProvider>) -> Self {
        Self {
            retrieval,
            web_search,
        }
    }

    /// The provider serving a routing decision
    pub fn provider_for(&self, route: RouteDecision) -> &Arc<dyn EvidenceProvider> {
        match route {
            RouteDecision::KnowledgeBase => &self.retrieval,
            RouteDecision::LiveSearch => &self.web_search,
        }
    }
}
