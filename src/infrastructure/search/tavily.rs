use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{Evidence, EvidenceProvider, PipelineError, ProviderRole, Query};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Live web search via the Tavily API
///
/// Each result snippet becomes one piece of evidence with its URL as the
/// source, keeping the service's ranking.
#[derive(Debug)]
pub struct TavilySearch<C: HttpClientTrait> {
    client: C,
    api_key: String,
    base_url: String,
    max_results: usize,
}

impl<C: HttpClientTrait> TavilySearch<C> {
    pub fn new(client: C, api_key: impl Into<String>, max_results: usize) -> Self {
        Self::with_base_url(client, api_key, max_results, DEFAULT_TAVILY_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        max_results: usize,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_results,
        }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    url: String,
    content: String,
}

#[async_trait]
impl<C: HttpClientTrait> EvidenceProvider for TavilySearch<C> {
    fn role(&self) -> ProviderRole {
        ProviderRole::WebSearch
    }

    async fn provide(&self, query: &Query) -> Result<Vec<Evidence>, PipelineError> {
        let body = serde_json::json!({
            "api_key": self.api_key,
            "query": query.as_str(),
            "max_results": self.max_results,
        });

        let json = self
            .client
            .post_json(
                &self.search_url(),
                vec![("Content-Type", "application/json")],
                &body,
            )
            .await
            .map_err(rebadge)?;

        let response: TavilyResponse = serde_json::from_value(json).map_err(|e| {
            PipelineError::provider("tavily", format!("failed to parse response: {e}"))
        })?;

        debug!(results = response.results.len(), "web search finished");

        Ok(response
            .results
            .into_iter()
            .take(self.max_results)
            .map(|result| Evidence::from_web(result.url, result.content))
            .collect())
    }
}

/// Attribute transport errors to the search service
fn rebadge(error: PipelineError) -> PipelineError {
    match error {
        PipelineError::Provider {
            message, timed_out, ..
        } => PipelineError::Provider {
            provider: "tavily".to_string(),
            message,
            timed_out,
        },
        other => other,
    }
}
