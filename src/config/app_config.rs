use serde::Deserialize;

use crate::domain::PipelineError;

/// Application configuration
///
/// Layered from `config/default` and `config/local` files with `APP__`
/// environment overrides; every section falls back to its defaults when
/// absent.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Language-model service settings
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for OpenAI-compatible endpoints (LM Studio, vLLM, ...)
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Pipeline loop bounds and provider result counts
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_max_rewrites")]
    pub max_rewrites: u32,
    #[serde(default = "default_max_generations")]
    pub max_generations: u32,
    #[serde(default = "default_retrieval_top_k")]
    pub retrieval_top_k: usize,
    #[serde(default = "default_web_search_max_results")]
    pub web_search_max_results: usize,
    /// Closed set of topics the knowledge base covers; anything outside
    /// routes to live search
    #[serde(default = "default_topics")]
    pub knowledge_base_topics: Vec<String>,
}

/// Knowledge-index access
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RetrievalConfig {
    /// Vector-search service endpoint; seeded passages serve retrieval when
    /// no endpoint is configured
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub passages: Vec<PassageConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PassageConfig {
    pub id: String,
    pub content: String,
}

/// Web-search service settings
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SearchConfig {
    /// Override for the search API endpoint
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_rewrites() -> u32 {
    3
}

fn default_max_generations() -> u32 {
    3
}

fn default_retrieval_top_k() -> usize {
    4
}

fn default_web_search_max_results() -> usize {
    5
}

fn default_topics() -> Vec<String> {
    vec![
        "Agents".to_string(),
        "Prompt Engineering".to_string(),
        "Adversarial Attacks".to_string(),
    ]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_rewrites: default_max_rewrites(),
            max_generations: default_max_generations(),
            retrieval_top_k: default_retrieval_top_k(),
            web_search_max_results: default_web_search_max_results(),
            knowledge_base_topics: default_topics(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.llm.model.trim().is_empty() {
            return Err(PipelineError::configuration("llm.model must not be empty"));
        }
        if self.llm.timeout_secs == 0 {
            return Err(PipelineError::configuration(
                "llm.timeout_secs must be at least 1",
            ));
        }
        if self.pipeline.knowledge_base_topics.is_empty() {
            return Err(PipelineError::configuration(
                "pipeline.knowledge_base_topics must not be empty",
            ));
        }
        if self.pipeline.retrieval_top_k == 0 {
            return Err(PipelineError::configuration(
                "pipeline.retrieval_top_k must be at least 1",
            ));
        }
        if self.pipeline.web_search_max_results == 0 {
            return Err(PipelineError::configuration(
                "pipeline.web_search_max_results must be at least 1",
            ));
        }
        if self.pipeline.max_generations == 0 {
            return Err(PipelineError::configuration(
                "pipeline.max_generations must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.llm.timeout_secs, 30);
        assert_eq!(config.pipeline.max_rewrites, 3);
        assert_eq!(config.pipeline.max_generations, 3);
        assert_eq!(config.pipeline.retrieval_top_k, 4);
        assert_eq!(config.pipeline.web_search_max_results, 5);
        assert_eq!(config.pipeline.knowledge_base_topics.len(), 3);
        assert!(config.retrieval.endpoint.is_none());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_topics_rejected() {
        let mut config = AppConfig::default();
        config.pipeline.knowledge_base_topics.clear();

        assert!(matches!(
            config.validate().unwrap_err(),
            PipelineError::Configuration { .. }
        ));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut config = AppConfig::default();
        config.pipeline.retrieval_top_k = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "pipeline": {"max_rewrites": 5}
        }))
        .unwrap();

        assert_eq!(config.pipeline.max_rewrites, 5);
        assert_eq!(config.pipeline.max_generations, 3);
        assert_eq!(config.llm.model, "gpt-4o-mini");
    }
}
