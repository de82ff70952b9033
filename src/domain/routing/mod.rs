//! Query routing
//!
//! Decides which evidence path a question takes before any retrieval
//! happens. The knowledge base covers a closed, configuration-supplied set
//! of topics; everything else goes to live search.

use std::sync::Arc;

use tracing::debug;

use crate::domain::classifier::Classifier;
use crate::domain::error::PipelineError;
use crate::domain::llm::LlmProvider;
use crate::domain::pipeline::{Query, RouteDecision};

/// Routes questions to the knowledge index or live web search
#[derive(Debug, Clone)]
pub struct QueryRouter {
    classifier: Classifier,
    system_prompt: String,
}

impl QueryRouter {
    /// Build a router over the given topic list
    ///
    /// Fails with a configuration error when the topic list is empty, since
    /// a topicless knowledge base can never win a routing decision.
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        topics: &[String],
    ) -> Result<Self, PipelineError> {
        if topics.is_empty() {
            return Err(PipelineError::configuration(
                "knowledge base topic list is empty",
            ));
        }

        let system_prompt = format!(
            "You are an expert at routing a user question to the most appropriate \
             data source.\n\n\
             The knowledge base contains documents related to the following topics:\n\
             {}\n\n\
             For questions on these topics, choose the knowledge base. For all other \
             questions, choose live web search so the answer reflects current \
             information from the internet.\n\n\
             Respond with exactly one label: 'knowledge_base' or 'live_search'.",
            topics.join(", ")
        );

        Ok(Self {
            classifier: Classifier::new(provider),
            system_prompt,
        })
    }

    /// Route one question
    ///
    /// A single classifier call with no side effects; a failed call aborts
    /// the turn rather than being retried here.
    pub async fn route(&self, query: &Query) -> Result<RouteDecision, PipelineError> {
        let decision: RouteDecision = self
            .classifier
            .classify(&self.system_prompt, query.as_str())
            .await?;

        debug!(query = %query, decision = ?decision, "routed question");
        Ok(decision)
    }
}
