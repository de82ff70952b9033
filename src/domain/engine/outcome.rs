use serde::{Deserialize, Serialize};

use crate::domain::error::{ExhaustedBudget, PipelineError};
use crate::domain::pipeline::Query;

/// Terminal outcome of one turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum TurnOutcome {
    /// The pipeline produced a validated answer
    Answered { generation: String },
    /// A correction budget ran out before a satisfactory answer was found
    ///
    /// An expected terminal, not an infrastructure error.
    Exhausted { budget: ExhaustedBudget, limit: u32 },
}

impl TurnOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, Self::Answered { .. })
    }

    pub fn generation(&self) -> Option<&str> {
        match self {
            Self::Answered { generation } => Some(generation),
            Self::Exhausted { .. } => None,
        }
    }

    /// Caller-facing description of a failed turn
    pub fn failure_reason(&self) -> Option<String> {
        self.as_error().map(|error| {
            format!("could not produce a satisfactory answer ({error})")
        })
    }

    /// The exhausted-budget terminal as an error value
    ///
    /// For callers that want a `Result`-shaped surface; inside the pipeline
    /// an exhausted budget is an expected outcome, not a failure.
    pub fn as_error(&self) -> Option<PipelineError> {
        match self {
            Self::Answered { .. } => None,
            Self::Exhausted { budget, limit } => {
                Some(PipelineError::loop_bound(*budget, *limit))
            }
        }
    }
}

/// What the engine emits for one completed turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    /// The question as the user asked it; rewrites never surface here
    pub question: Query,
    pub outcome: TurnOutcome,
}

impl TurnReport {
    pub fn answered(question: Query, generation: String) -> Self {
        Self {
            question,
            outcome: TurnOutcome::Answered { generation },
        }
    }

    pub fn exhausted(question: Query, budget: ExhaustedBudget, limit: u32) -> Self {
        Self {
            question,
            outcome: TurnOutcome::Exhausted { budget, limit },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answered_outcome() {
        let report = TurnReport::answered(Query::new("q"), "an answer".to_string());

        assert!(report.outcome.is_answered());
        assert_eq!(report.outcome.generation(), Some("an answer"));
        assert!(report.outcome.failure_reason().is_none());
    }

    #[test]
    fn test_exhausted_outcome_has_no_generation() {
        let report = TurnReport::exhausted(Query::new("q"), ExhaustedBudget::Generation, 3);

        assert!(!report.outcome.is_answered());
        assert!(report.outcome.generation().is_none());
        assert_eq!(
            report.outcome.failure_reason().unwrap(),
            "could not produce a satisfactory answer (generation budget of 3 exhausted)"
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = TurnOutcome::Exhausted {
            budget: ExhaustedBudget::Rewrite,
            limit: 3,
        };

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["result"], "exhausted");
        assert_eq!(json["budget"], "rewrite");
        assert_eq!(json["limit"], 3);
    }
}
