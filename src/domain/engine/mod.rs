//! Workflow engine
//!
//! The state machine driving one turn: route, gather evidence, grade it,
//! generate, validate, and loop through rewriting or regeneration when the
//! evidence or the answer falls short. Every correction loop is bounded by
//! an explicit budget; running out of budget is a named terminal outcome,
//! never an endless loop.

mod outcome;

pub use outcome::{TurnOutcome, TurnReport};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::error::{ExhaustedBudget, PipelineError};
use crate::domain::generation::AnswerGenerator;
use crate::domain::grading::{DocumentGrader, OutputValidator};
use crate::domain::llm::LlmProvider;
use crate::domain::pipeline::{AnswerVerdict, PipelineState, Query};
use crate::domain::provider::ProviderRegistry;
use crate::domain::rewrite::QuestionRewriter;
use crate::domain::routing::QueryRouter;

/// Steps of the turn state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    Route,
    ProvideEvidence,
    GradeDocs,
    Rewrite,
    Generate,
    Validate,
    Done,
    Failed { budget: ExhaustedBudget, limit: u32 },
}

/// Budgets bounding the engine's correction loops
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum query rewrites per turn
    pub max_rewrites: u32,
    /// Maximum generator invocations per turn
    pub max_generations: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_rewrites: 3,
            max_generations: 3,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rewrites(mut self, max_rewrites: u32) -> Self {
        self.max_rewrites = max_rewrites;
        self
    }

    pub fn with_max_generations(mut self, max_generations: u32) -> Self {
        self.max_generations = max_generations;
        self
    }
}

/// The engine sequencing one turn through the workflow states
#[derive(Debug, Clone)]
pub struct WorkflowEngine {
    router: QueryRouter,
    providers: ProviderRegistry,
    grader: DocumentGrader,
    generator: AnswerGenerator,
    validator: OutputValidator,
    rewriter: QuestionRewriter,
    config: EngineConfig,
}

impl WorkflowEngine {
    pub fn new(
        router: QueryRouter,
        providers: ProviderRegistry,
        grader: DocumentGrader,
        generator: AnswerGenerator,
        validator: OutputValidator,
        rewriter: QuestionRewriter,
        config: EngineConfig,
    ) -> Self {
        Self {
            router,
            providers,
            grader,
            generator,
            validator,
            rewriter,
            config,
        }
    }

    /// Build an engine whose language-model roles all share one provider
    pub fn with_shared_model(
        llm: Arc<dyn LlmProvider>,
        providers: ProviderRegistry,
        topics: &[String],
        config: EngineConfig,
    ) -> Result<Self, PipelineError> {
        Ok(Self::new(
            QueryRouter::new(llm.clone(), topics)?,
            providers,
            DocumentGrader::new(llm.clone()),
            AnswerGenerator::new(llm.clone()),
            OutputValidator::new(llm.clone()),
            QuestionRewriter::new(llm),
            config,
        ))
    }

    /// Run one turn to a terminal
    ///
    /// Returns the turn report on both the answered and budget-exhausted
    /// terminals; infrastructure failures abort with an error and surface no
    /// partial generation. The future is safe to drop at any await point,
    /// since nothing is committed until it resolves.
    pub async fn run(&self, question: Query) -> Result<TurnReport, PipelineError> {
        let mut state = PipelineState::new(question);
        let mut step = WorkflowState::Route;

        info!(question = %state.original_query(), "starting turn");

        let report = loop {
            debug!(step = ?step, "entering step");

            step = match step {
                WorkflowState::Route => {
                    let route = self.router.route(state.current_query()).await?;
                    state.set_route(route);
                    WorkflowState::ProvideEvidence
                }

                WorkflowState::ProvideEvidence => self.provide_evidence(&mut state).await?,

                WorkflowState::GradeDocs => {
                    let graded = self
                        .grader
                        .filter(state.current_query(), state.evidence().to_vec())
                        .await?;

                    // Structural decision, no model call: empty filtered
                    // evidence means the query needs work before generating.
                    let next = if graded.is_empty() {
                        WorkflowState::Rewrite
                    } else {
                        WorkflowState::Generate
                    };

                    state.set_evidence(graded);
                    next
                }

                WorkflowState::Rewrite => {
                    if state.rewrite_count() >= self.config.max_rewrites {
                        WorkflowState::Failed {
                            budget: ExhaustedBudget::Rewrite,
                            limit: self.config.max_rewrites,
                        }
                    } else {
                        let rewritten = self.rewriter.rewrite(state.current_query()).await?;
                        state.apply_rewrite(rewritten);
                        WorkflowState::ProvideEvidence
                    }
                }

                WorkflowState::Generate => self.generate(&mut state).await?,

                WorkflowState::Validate => {
                    let generation = state.generation().ok_or_else(|| {
                        PipelineError::generation("no generation available to validate")
                    })?;
                    let verdict = self
                        .validator
                        .validate(state.current_query(), state.evidence(), generation)
                        .await?;

                    match verdict {
                        AnswerVerdict::Useful => WorkflowState::Done,
                        AnswerVerdict::Unsupported => {
                            if state.generation_count() >= self.config.max_generations {
                                WorkflowState::Failed {
                                    budget: ExhaustedBudget::Generation,
                                    limit: self.config.max_generations,
                                }
                            } else {
                                WorkflowState::Generate
                            }
                        }
                        AnswerVerdict::Irrelevant => WorkflowState::Rewrite,
                    }
                }

                WorkflowState::Done => {
                    let generation = state
                        .generation()
                        .ok_or_else(|| {
                            PipelineError::generation("terminal reached without a generation")
                        })?
                        .to_string();

                    info!("turn answered");
                    break TurnReport::answered(state.original_query().clone(), generation);
                }

                WorkflowState::Failed { budget, limit } => {
                    info!(budget = %budget, limit, "turn exhausted its correction budget");
                    break TurnReport::exhausted(state.original_query().clone(), budget, limit);
                }
            };
        };

        Ok(report)
    }

    /// Gather evidence from the provider chosen at routing time
    ///
    /// The routed provider serves every evidence call of the turn, including
    /// re-retrieval after a rewrite. A timed-out call is retried against the
    /// rewrite budget instead of getting a fresh unbounded attempt.
    async fn provide_evidence(
        &self,
        state: &mut PipelineState,
    ) -> Result<WorkflowState, PipelineError> {
        let route = state.route().ok_or_else(|| {
            PipelineError::configuration("no routing decision before evidence provision")
        })?;
        let provider = self.providers.provider_for(route);

        match provider.provide(state.current_query()).await {
            Ok(evidence) => {
                debug!(
                    provider = provider.role().as_str(),
                    count = evidence.len(),
                    "evidence provided"
                );
                state.set_evidence(evidence);
                Ok(WorkflowState::GradeDocs)
            }
            Err(e) if e.is_timeout() && state.rewrite_count() < self.config.max_rewrites => {
                warn!(error = %e, "evidence call timed out, retrying against the rewrite budget");
                state.note_retrieval_retry();
                Ok(WorkflowState::ProvideEvidence)
            }
            Err(e) => Err(e),
        }
    }

    /// Generate an answer, counting the attempt against the generation budget
    async fn generate(&self, state: &mut PipelineState) -> Result<WorkflowState, PipelineError> {
        state.note_generation_attempt();

        match self
            .generator
            .generate(state.current_query(), state.evidence())
            .await
        {
            Ok(generation) => {
                state.set_generation(generation);
                Ok(WorkflowState::Validate)
            }
            Err(e) if e.is_timeout() && state.generation_count() < self.config.max_generations => {
                warn!(error = %e, "generation timed out, retrying against the generation budget");
                Ok(WorkflowState::Generate)
            }
            Err(e) => Err(e),
        }
    }
}
