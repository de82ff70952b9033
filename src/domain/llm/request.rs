use serde::{Deserialize, Serialize};

/// Parameters for one completion call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmRequest {
    /// System instructions framing the role of the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// User payload the model responds to
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn builder() -> LlmRequestBuilder {
        LlmRequestBuilder::default()
    }
}

/// Builder for [`LlmRequest`]
#[derive(Debug, Default)]
pub struct LlmRequestBuilder {
    system: Option<String>,
    user: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl LlmRequestBuilder {
    pub fn system(mut self, content: impl Into<String>) -> Self {
        self.system = Some(content.into());
        self
    }

    pub fn user(mut self, content: impl Into<String>) -> Self {
        self.user = Some(content.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn build(self) -> LlmRequest {
        LlmRequest {
            system: self.system,
            user: self.user.unwrap_or_default(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
