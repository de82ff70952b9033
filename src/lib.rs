//! Adaptive RAG pipeline
//!
//! Answers a user question by adaptively choosing between a curated
//! knowledge index and live web search, validating the generated answer for
//! grounding and relevance, and self-correcting through query rewriting
//! when the evidence or the answer falls short. The workflow engine bounds
//! every correction loop, so a turn always reaches a terminal outcome.

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    EngineConfig, PipelineError, SessionContext, TurnOutcome, TurnReport, WorkflowEngine,
};

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use domain::{EvidenceProvider, LlmProvider, ProviderRegistry};
use infrastructure::{
    HttpClient, HttpRetrievalService, InMemoryRetriever, OpenAiProvider, Passage, TavilySearch,
};

/// Build a ready-to-run engine from configuration and environment
///
/// API keys come from the environment (`OPENAI_API_KEY`, `TAVILY_API_KEY`);
/// everything else from [`AppConfig`].
pub fn create_engine(config: &AppConfig) -> anyhow::Result<WorkflowEngine> {
    let timeout = Duration::from_secs(config.llm.timeout_secs);

    let llm = create_llm_provider(config, timeout)?;
    let providers = create_provider_registry(config, timeout)?;

    let engine_config = EngineConfig::new()
        .with_max_rewrites(config.pipeline.max_rewrites)
        .with_max_generations(config.pipeline.max_generations);

    let engine = WorkflowEngine::with_shared_model(
        llm,
        providers,
        &config.pipeline.knowledge_base_topics,
        engine_config,
    )?;

    Ok(engine)
}

fn create_llm_provider(
    config: &AppConfig,
    timeout: Duration,
) -> anyhow::Result<Arc<dyn LlmProvider>> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable is required"))?;

    let client = HttpClient::with_timeout(timeout)?;

    let provider: Arc<dyn LlmProvider> = match &config.llm.base_url {
        Some(base_url) => {
            info!(
                "Using OpenAI-compatible provider at {} (model {})",
                base_url, config.llm.model
            );
            Arc::new(OpenAiProvider::with_base_url(
                client,
                api_key,
                &config.llm.model,
                base_url,
            ))
        }
        None => {
            info!("Using OpenAI provider (model {})", config.llm.model);
            Arc::new(OpenAiProvider::new(client, api_key, &config.llm.model))
        }
    };

    Ok(provider)
}

fn create_provider_registry(
    config: &AppConfig,
    timeout: Duration,
) -> anyhow::Result<ProviderRegistry> {
    let retrieval: Arc<dyn EvidenceProvider> = match &config.retrieval.endpoint {
        Some(endpoint) => {
            info!("Using vector-search retrieval service at {}", endpoint);
            Arc::new(HttpRetrievalService::new(
                HttpClient::with_timeout(timeout)?,
                endpoint,
                config.pipeline.retrieval_top_k,
            ))
        }
        None => {
            info!(
                "No retrieval endpoint configured, serving {} seeded passages",
                config.retrieval.passages.len()
            );
            let passages = config
                .retrieval
                .passages
                .iter()
                .map(|p| Passage::new(&p.id, &p.content))
                .collect();
            Arc::new(InMemoryRetriever::new(
                passages,
                config.pipeline.retrieval_top_k,
            ))
        }
    };

    let tavily_key = std::env::var("TAVILY_API_KEY")
        .map_err(|_| anyhow::anyhow!("TAVILY_API_KEY environment variable is required"))?;

    let web_client = HttpClient::with_timeout(timeout)?;
    let web_search: Arc<dyn EvidenceProvider> = match &config.search.base_url {
        Some(base_url) => Arc::new(TavilySearch::with_base_url(
            web_client,
            tavily_key,
            config.pipeline.web_search_max_results,
            base_url,
        )),
        None => Arc::new(TavilySearch::new(
            web_client,
            tavily_key,
            config.pipeline.web_search_max_results,
        )),
    };

    Ok(ProviderRegistry::new(retrieval, web_search))
}
