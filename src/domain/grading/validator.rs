use std::sync::Arc;

use tracing::debug;

use crate::domain::classifier::Classifier;
use crate::domain::error::PipelineError;
use crate::domain::llm::LlmProvider;
use crate::domain::pipeline::{AnswerVerdict, BinaryGrade, Evidence, Query};

const GROUNDEDNESS_SYSTEM_PROMPT: &str = "You are a grader assessing whether a generated \
answer is grounded in a set of retrieved facts.\n\n\
- If every claim in the answer is supported by the facts, respond 'yes'.\n\
- If the answer contains information that is unsupported by or contradicts the \
facts, respond 'no'.\n\n\
Respond with exactly one label: 'yes' or 'no'.";

const RELEVANCE_SYSTEM_PROMPT: &str = "You are a grader assessing whether an answer \
addresses a user question.\n\n\
- If the answer resolves the question, respond 'yes'.\n\
- If the answer is incomplete, off-topic or does not resolve the question, \
respond 'no'.\n\n\
Respond with exactly one label: 'yes' or 'no'.";

/// Two-stage answer validation cascade
///
/// Groundedness is checked first; an ungrounded answer is `Unsupported` and
/// the relevance check is skipped. An answer can only be `Useful` once it
/// has passed the groundedness stage.
#[derive(Debug, Clone)]
pub struct OutputValidator {
    classifier: Classifier,
}

impl OutputValidator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            classifier: Classifier::new(provider),
        }
    }

    /// Produce exactly one verdict for a generated answer
    pub async fn validate(
        &self,
        query: &Query,
        evidence: &[Evidence],
        generation: &str,
    ) -> Result<AnswerVerdict, PipelineError> {
        let facts = Evidence::join_context(evidence);
        let groundedness_payload = format!(
            "Facts:\n{facts}\n\nGenerated answer: {generation}"
        );

        let grounded: BinaryGrade = self
            .classifier
            .classify(GROUNDEDNESS_SYSTEM_PROMPT, &groundedness_payload)
            .await?;

        if !grounded.is_yes() {
            debug!("answer is not grounded in the evidence");
            return Ok(AnswerVerdict::Unsupported);
        }

        let relevance_payload = format!(
            "User question: {query}\n\nAnswer: {generation}"
        );

        let addresses: BinaryGrade = self
            .classifier
            .classify(RELEVANCE_SYSTEM_PROMPT, &relevance_payload)
            .await?;

        let verdict = if addresses.is_yes() {
            AnswerVerdict::Useful
        } else {
            AnswerVerdict::Irrelevant
        };

        debug!(verdict = %verdict, "answer validated");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;

    fn evidence() -> Vec<Evidence> {
        vec![Evidence::from_index("doc-1", "Agents plan and use tools.")]
    }

    #[tokio::test]
    async fn test_ungrounded_answer_short_circuits() {
        let provider = Arc::new(MockLlmProvider::new().push_text("no"));
        let validator = OutputValidator::new(provider.clone());

        let verdict = validator
            .validate(&Query::new("q"), &evidence(), "made-up claims")
            .await
            .unwrap();

        assert_eq!(verdict, AnswerVerdict::Unsupported);
        // The relevance stage never ran
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_grounded_and_relevant_is_useful() {
        let provider = Arc::new(MockLlmProvider::new().push_text("yes").push_text("yes"));
        let validator = OutputValidator::new(provider.clone());

        let verdict = validator
            .validate(&Query::new("q"), &evidence(), "agents plan and use tools")
            .await
            .unwrap();

        assert_eq!(verdict, AnswerVerdict::Useful);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_grounded_but_off_topic_is_irrelevant() {
        let provider = Arc::new(MockLlmProvider::new().push_text("yes").push_text("no"));
        let validator = OutputValidator::new(provider);

        let verdict = validator
            .validate(&Query::new("q"), &evidence(), "true but beside the point")
            .await
            .unwrap();

        assert_eq!(verdict, AnswerVerdict::Irrelevant);
    }

    #[tokio::test]
    async fn test_stage_payloads() {
        let provider = Arc::new(MockLlmProvider::new().push_text("yes").push_text("yes"));
        let validator = OutputValidator::new(provider.clone());

        validator
            .validate(&Query::new("what are agents?"), &evidence(), "an answer")
            .await
            .unwrap();

        let requests = provider.requests();
        // Stage one sees the formatted facts and the generation
        assert!(requests[0].user.contains("[doc-1]"));
        assert!(requests[0].user.contains("an answer"));
        // Stage two sees the question and the generation, not the facts
        assert!(requests[1].user.contains("what are agents?"));
        assert!(!requests[1].user.contains("[doc-1]"));
    }

    #[tokio::test]
    async fn test_classifier_failure_propagates() {
        let provider = Arc::new(MockLlmProvider::new().push_text("gibberish"));
        let validator = OutputValidator::new(provider);

        let result = validator.validate(&Query::new("q"), &evidence(), "answer").await;

        assert!(matches!(
            result.unwrap_err(),
            PipelineError::Classification { .. }
        ));
    }
}
