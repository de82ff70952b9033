use serde::{Deserialize, Serialize};

/// One completion returned by the model service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text, as returned by the provider
    pub content: String,
    /// Model that produced the completion
    pub model: String,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
        }
    }

    /// Completion text with surrounding whitespace removed
    pub fn trimmed(&self) -> &str {
        self.content.trim()
    }
}
