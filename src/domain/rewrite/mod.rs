//! Question rewriting
//!
//! Reformulates the current query into a version structured for better
//! retrieval. A pure text transform; the engine decides when to apply it
//! and installs the result as the new current query.

use std::sync::Arc;

use tracing::debug;

use crate::domain::error::PipelineError;
use crate::domain::generation::map_error;
use crate::domain::llm::{LlmProvider, LlmRequest};
use crate::domain::pipeline::Query;

const REWRITER_SYSTEM_PROMPT: &str = "You are a question rewriter that optimizes questions \
for retrieval. Analyze the semantic intent of the input question and produce a \
clearer, more specific version of it. Respond with the rewritten question only, \
no explanation.";

const REWRITER_MAX_TOKENS: u32 = 200;

/// Rewrites questions to improve retrieval
#[derive(Debug, Clone)]
pub struct QuestionRewriter {
    provider: Arc<dyn LlmProvider>,
}

impl QuestionRewriter {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Produce a rewritten form of `query`
    pub async fn rewrite(&self, query: &Query) -> Result<Query, PipelineError> {
        let request = LlmRequest::builder()
            .system(REWRITER_SYSTEM_PROMPT)
            .user(format!("Original question: {query}"))
            .max_tokens(REWRITER_MAX_TOKENS)
            .build();

        let response = self.provider.complete(request).await.map_err(map_error)?;
        let rewritten = response.trimmed().trim_matches('"').trim();

        if rewritten.is_empty() {
            return Err(PipelineError::generation(
                "rewriter returned an empty question",
            ));
        }

        debug!(original = %query, rewritten, "rewrote question");
        Ok(Query::new(rewritten))
    }
}
