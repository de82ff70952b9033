use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{Evidence, EvidenceProvider, PipelineError, ProviderRole, Query};
use crate::infrastructure::http_client::HttpClientTrait;

/// Retrieval client for a vector-search service
///
/// POSTs `{query, top_k}` to the configured endpoint and maps the ranked
/// hits to evidence, preserving rank order.
#[derive(Debug)]
pub struct HttpRetrievalService<C: HttpClientTrait> {
    client: C,
    endpoint: String,
    top_k: usize,
}

impl<C: HttpClientTrait> HttpRetrievalService<C> {
    pub fn new(client: C, endpoint: impl Into<String>, top_k: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            top_k,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: String,
    content: String,
}

#[async_trait]
impl<C: HttpClientTrait> EvidenceProvider for HttpRetrievalService<C> {
    fn role(&self) -> ProviderRole {
        ProviderRole::Retrieval
    }

    async fn provide(&self, query: &Query) -> Result<Vec<Evidence>, PipelineError> {
        let body = serde_json::json!({
            "query": query.as_str(),
            "top_k": self.top_k,
        });

        let json = self
            .client
            .post_json(&self.endpoint, vec![("Content-Type", "application/json")], &body)
            .await
            .map_err(rebadge)?;

        let response: SearchResponse = serde_json::from_value(json).map_err(|e| {
            PipelineError::provider("retrieval", format!("failed to parse response: {e}"))
        })?;

        debug!(hits = response.results.len(), "index lookup finished");

        Ok(response
            .results
            .into_iter()
            .map(|hit| Evidence::from_index(hit.id, hit.content))
            .collect())
    }
}

/// Attribute transport errors to the retrieval service
fn rebadge(error: PipelineError) -> PipelineError {
    match error {
        PipelineError::Provider {
            message, timed_out, ..
        } => PipelineError::Provider {
            provider: "retrieval".to_string(),
            message,
            timed_out,
        },
        other => other,
    }
}
