//! Session context
//!
//! Caller-owned state spanning turns: the transcript of questions and
//! outcomes. The engine itself holds nothing across turns; a turn borrows
//! the session exclusively, so two turns of one session can never run
//! concurrently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::engine::{TurnOutcome, TurnReport, WorkflowEngine};
use crate::domain::error::PipelineError;
use crate::domain::pipeline::Query;

/// One completed turn as recorded in the transcript
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub id: Uuid,
    pub asked_at: DateTime<Utc>,
    /// The question as the user asked it
    pub question: String,
    pub outcome: TurnOutcome,
}

/// Transcript and per-session state, owned by the caller
#[derive(Debug, Default)]
pub struct SessionContext {
    transcript: Vec<TurnRecord>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one turn and record its outcome
    ///
    /// Exactly one record is appended per completed turn. A turn that fails
    /// with an infrastructure error, or is cancelled mid-flight, commits
    /// nothing to the transcript.
    pub async fn ask(
        &mut self,
        engine: &WorkflowEngine,
        question: impl Into<String>,
    ) -> Result<&TurnRecord, PipelineError> {
        let asked_at = Utc::now();
        let report = engine.run(Query::new(question)).await?;
        Ok(self.record(report, asked_at))
    }

    fn record(&mut self, report: TurnReport, asked_at: DateTime<Utc>) -> &TurnRecord {
        self.transcript.push(TurnRecord {
            id: Uuid::new_v4(),
            asked_at,
            question: report.question.as_str().to_string(),
            outcome: report.outcome,
        });

        let last = self.transcript.len() - 1;
        &self.transcript[last]
    }

    pub fn transcript(&self) -> &[TurnRecord] {
        &self.transcript
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::domain::engine::EngineConfig;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::pipeline::Evidence;
    use crate::domain::provider::mock::MockEvidenceProvider;
    use crate::domain::provider::{ProviderRegistry, ProviderRole};

    fn engine_with_router(router: Arc<MockLlmProvider>) -> WorkflowEngine {
        let llm: Arc<MockLlmProvider> = Arc::new(MockLlmProvider::always("yes"));
        let retrieval = Arc::new(
            MockEvidenceProvider::new(ProviderRole::Retrieval)
                .with_default_batch(vec![Evidence::from_index("doc-1", "Agents plan.")]),
        );
        let web = Arc::new(MockEvidenceProvider::new(ProviderRole::WebSearch));

        WorkflowEngine::new(
            crate::domain::routing::QueryRouter::new(router, &["Agents".to_string()]).unwrap(),
            ProviderRegistry::new(retrieval, web),
            crate::domain::grading::DocumentGrader::new(llm.clone()),
            crate::domain::generation::AnswerGenerator::new(Arc::new(MockLlmProvider::always(
                "an answer",
            ))),
            crate::domain::grading::OutputValidator::new(llm.clone()),
            crate::domain::rewrite::QuestionRewriter::new(llm),
            EngineConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_ask_appends_exactly_one_record() {
        let engine = engine_with_router(Arc::new(MockLlmProvider::always("knowledge_base")));
        let mut session = SessionContext::new();

        let record = session.ask(&engine, "What are agents?").await.unwrap();
        assert_eq!(record.question, "What are agents?");
        assert!(record.outcome.is_answered());

        assert_eq!(session.len(), 1);

        session.ask(&engine, "And what else?").await.unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.transcript()[0].question, "What are agents?");
        assert_eq!(session.transcript()[1].question, "And what else?");
    }

    #[tokio::test]
    async fn test_failed_turn_commits_nothing() {
        let engine = engine_with_router(Arc::new(MockLlmProvider::new().push_error("503")));
        let mut session = SessionContext::new();

        let result = session.ask(&engine, "What are agents?").await;

        assert!(result.is_err());
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_records_carry_distinct_ids() {
        let engine = engine_with_router(Arc::new(MockLlmProvider::always("knowledge_base")));
        let mut session = SessionContext::new();

        session.ask(&engine, "first").await.unwrap();
        session.ask(&engine, "second").await.unwrap();

        let ids: Vec<Uuid> = session.transcript().iter().map(|r| r.id).collect();
        assert_ne!(ids[0], ids[1]);
    }
}
