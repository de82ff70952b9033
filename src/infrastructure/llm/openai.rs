use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{LlmProvider, LlmRequest, LlmResponse, PipelineError};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// OpenAI-compatible chat-completions provider
///
/// One model per instance; the pipeline's roles differ only in the prompts
/// they send, not in the model they talk to.
#[derive(Debug)]
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    model: String,
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, model, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_body(&self, request: &LlmRequest) -> serde_json::Value {
        let mut messages = Vec::new();

        if let Some(ref system) = request.system {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": request.user}));

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        if let Some(temperature) = request.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }

        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<LlmResponse, PipelineError> {
        let response: ChatCompletionResponse = serde_json::from_value(json).map_err(|e| {
            PipelineError::provider("openai", format!("failed to parse response: {e}"))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::provider("openai", "no choices in response"))?;

        Ok(LlmResponse::new(
            choice.message.content.unwrap_or_default(),
            response.model,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    model: String,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenAiProvider<C> {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse, PipelineError> {
        let url = self.chat_completions_url();
        let body = self.build_body(&request);
        let headers = vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let json = self.client.post_json(&url, headers, &body).await?;
        self.parse_response(json)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
