use std::sync::Arc;

use tracing::debug;

use crate::domain::classifier::{ClassLabel, Classifier};
use crate::domain::error::PipelineError;
use crate::domain::llm::LlmProvider;
use crate::domain::pipeline::{BinaryGrade, Evidence, Query};

const GRADER_SYSTEM_PROMPT: &str = "You are a grader assessing the relevance of a retrieved \
document to a user question.\n\n\
Criteria:\n\
- If the document contains keywords, phrases or semantic meaning related to the \
question, grade it as relevant.\n\
- The test does not need to be strict; the goal is only to filter out clearly \
wrong retrievals.\n\n\
Respond with exactly one label: 'yes' (relevant) or 'no' (not relevant).";

/// Filters evidence by relevance to the current query
///
/// One classifier call per item, so cost is linear in evidence count. The
/// relevance criterion is deliberately permissive; discarding useful evidence
/// is the failure mode to avoid.
#[derive(Debug, Clone)]
pub struct DocumentGrader {
    classifier: Classifier,
}

impl DocumentGrader {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            classifier: Classifier::new(provider),
        }
    }

    /// Keep the sub-sequence of `evidence` graded relevant to `query`
    ///
    /// Order is preserved; an empty input returns empty without issuing any
    /// classifier calls. Kept items carry their relevance grade.
    pub async fn filter(
        &self,
        query: &Query,
        evidence: Vec<Evidence>,
    ) -> Result<Vec<Evidence>, PipelineError> {
        if evidence.is_empty() {
            return Ok(evidence);
        }

        let total = evidence.len();
        let mut kept = Vec::with_capacity(total);

        for item in evidence {
            let payload = format!(
                "Retrieved document:\n{}\n\nUser question: {}",
                item.content, query
            );
            let grade: BinaryGrade = self
                .classifier
                .classify(GRADER_SYSTEM_PROMPT, &payload)
                .await?;

            debug!(
                source = item.source.identifier(),
                grade = grade.as_str(),
                "graded document"
            );

            if grade.is_yes() {
                kept.push(item.with_relevance(grade));
            }
        }

        debug!(kept = kept.len(), total, "document grading finished");
        Ok(kept)
    }
}
