use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Iteration budgets that bound the pipeline's correction loops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedBudget {
    /// Query rewriting attempts
    Rewrite,
    /// Answer generation attempts
    Generation,
}

impl ExhaustedBudget {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rewrite => "rewrite",
            Self::Generation => "generation",
        }
    }
}

impl std::fmt::Display for ExhaustedBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while driving a pipeline turn
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Classification failed: {message}")]
    Classification {
        message: String,
        /// Raw model output, when the failure was an unparseable label
        raw_output: Option<String>,
    },

    #[error("Provider '{provider}' failed: {message}")]
    Provider {
        provider: String,
        message: String,
        timed_out: bool,
    },

    #[error("Generation failed: {message}")]
    Generation { message: String, timed_out: bool },

    #[error("{budget} budget of {limit} exhausted")]
    LoopBound { budget: ExhaustedBudget, limit: u32 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl PipelineError {
    pub fn classification(message: impl Into<String>) -> Self {
        Self::Classification {
            message: message.into(),
            raw_output: None,
        }
    }

    pub fn unparseable_label(message: impl Into<String>, raw_output: impl Into<String>) -> Self {
        Self::Classification {
            message: message.into(),
            raw_output: Some(raw_output.into()),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn provider_timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn generation_timeout(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn loop_bound(budget: ExhaustedBudget, limit: u32) -> Self {
        Self::LoopBound { budget, limit }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether the underlying call expired rather than failed outright
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Provider { timed_out: true, .. } | Self::Generation { timed_out: true, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_error_display() {
        let error = PipelineError::classification("model returned garbage");
        assert_eq!(
            error.to_string(),
            "Classification failed: model returned garbage"
        );
    }

    #[test]
    fn test_unparseable_label_keeps_raw_output() {
        let error = PipelineError::unparseable_label("no admissible label", "maybe?");
        match error {
            PipelineError::Classification { raw_output, .. } => {
                assert_eq!(raw_output.as_deref(), Some("maybe?"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_timeout_detection() {
        assert!(PipelineError::provider_timeout("search", "deadline expired").is_timeout());
        assert!(PipelineError::generation_timeout("deadline expired").is_timeout());
        assert!(!PipelineError::provider("search", "500").is_timeout());
        assert!(!PipelineError::classification("bad label").is_timeout());
    }

    #[test]
    fn test_loop_bound_display() {
        let error = PipelineError::loop_bound(ExhaustedBudget::Rewrite, 3);
        assert_eq!(error.to_string(), "rewrite budget of 3 exhausted");
    }
}
