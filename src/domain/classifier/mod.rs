//! Label-constrained classification on top of the LLM port
//!
//! Every routing and grading component issues its calls through
//! [`Classifier`], which pins the sampling temperature, parses the completion
//! against a closed label set and turns anything unparseable into a
//! distinguishable classification failure.

use std::sync::Arc;

use tracing::debug;

use crate::domain::error::PipelineError;
use crate::domain::llm::{LlmProvider, LlmRequest};

/// Closed set of labels a classification call may produce
///
/// Implemented by the verdict enums; `variants` lists every admissible label
/// and `as_str` gives its wire form.
pub trait ClassLabel: Sized + Copy + Eq + std::fmt::Debug + Send + 'static {
    fn variants() -> &'static [Self];

    fn as_str(&self) -> &'static str;
}

const CLASSIFY_MAX_TOKENS: u32 = 16;

/// Classifier issuing label-constrained completion calls
#[derive(Debug, Clone)]
pub struct Classifier {
    provider: Arc<dyn LlmProvider>,
}

impl Classifier {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Classify a payload into one of the labels of `L`
    ///
    /// The completion is matched leniently: exact label, label as a word in
    /// surrounding prose, or the label with underscores spelled as spaces.
    /// A completion matching zero or several labels is a classification
    /// failure carrying the raw output.
    pub async fn classify<L: ClassLabel>(
        &self,
        system: &str,
        payload: &str,
    ) -> Result<L, PipelineError> {
        let request = LlmRequest::builder()
            .system(system)
            .user(payload)
            .temperature(0.0)
            .max_tokens(CLASSIFY_MAX_TOKENS)
            .build();

        let response = self.provider.complete(request).await.map_err(|e| {
            PipelineError::classification(format!(
                "classifier call to '{}' failed: {}",
                self.provider.provider_name(),
                e
            ))
        })?;

        let raw = response.trimmed();
        let label = parse_label::<L>(raw)?;

        debug!(output = raw, label = label.as_str(), "classified");
        Ok(label)
    }
}

/// Match a completion against the labels of `L`
fn parse_label<L: ClassLabel>(raw: &str) -> Result<L, PipelineError> {
    let canonical = raw
        .to_lowercase()
        .replace('-', "_")
        .trim_matches(|c: char| c.is_whitespace() || "\"'`.!:".contains(c))
        .to_string();

    let matches: Vec<L> = L::variants()
        .iter()
        .copied()
        .filter(|label| matches_label(&canonical, label.as_str()))
        .collect();

    match matches.as_slice() {
        [label] => Ok(*label),
        [] => Err(PipelineError::unparseable_label(
            "completion matched no admissible label",
            raw,
        )),
        _ => Err(PipelineError::unparseable_label(
            "completion matched more than one admissible label",
            raw,
        )),
    }
}

fn matches_label(canonical: &str, label: &str) -> bool {
    if canonical == label {
        return true;
    }

    // Label as a standalone word inside prose; underscores survive the split
    if canonical
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .any(|token| token == label)
    {
        return true;
    }

    // Multi-word labels spelled with spaces ("knowledge base")
    label.contains('_') && canonical.contains(&label.replace('_', " "))
}
