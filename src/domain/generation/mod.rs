//! Answer generation
//!
//! Synthesizes an answer from the current query and the graded evidence.
//! The generator is stateless across retries; re-invoking it with the same
//! query/evidence pair is the engine's regeneration mechanism.

use std::sync::Arc;

use tracing::debug;

use crate::domain::error::PipelineError;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::pipeline::{Evidence, Query};

const GENERATOR_SYSTEM_PROMPT: &str = "You are an assistant answering questions from \
retrieved context. Use only the provided context to answer. If the context does \
not contain the answer, say that you do not know. Keep the answer concise.";

const GENERATOR_TEMPERATURE: f32 = 0.7;
const GENERATOR_MAX_TOKENS: u32 = 1000;

/// Generates answers from query plus filtered evidence
#[derive(Debug, Clone)]
pub struct AnswerGenerator {
    provider: Arc<dyn LlmProvider>,
}

impl AnswerGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Generate one answer for `query` over `evidence`
    pub async fn generate(
        &self,
        query: &Query,
        evidence: &[Evidence],
    ) -> Result<String, PipelineError> {
        let context = Evidence::join_context(evidence);
        let request = LlmRequest::builder()
            .system(GENERATOR_SYSTEM_PROMPT)
            .user(format!("Context:\n{context}\n\nQuestion: {query}"))
            .temperature(GENERATOR_TEMPERATURE)
            .max_tokens(GENERATOR_MAX_TOKENS)
            .build();

        let response = self.provider.complete(request).await.map_err(map_error)?;
        let generation = response.trimmed().to_string();

        if generation.is_empty() {
            return Err(PipelineError::generation("model returned an empty answer"));
        }

        debug!(chars = generation.len(), "generated answer");
        Ok(generation)
    }
}

/// Re-badge provider transport errors as generation failures
pub(crate) fn map_error(error: PipelineError) -> PipelineError {
    match error {
        PipelineError::Provider {
            message, timed_out, ..
        } => PipelineError::Generation { message, timed_out },
        other => other,
    }
}
