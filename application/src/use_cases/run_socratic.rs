//! Run Socratic use case
//!
//! One thinker, one questioner, one question:
//!
//! ```text
//! initial analysis
//!        ↓
//! ┌─→ evaluate (questioner scores, asks a follow-up)
//! │      ↓ quality evaluator
//! │   continue? ── no ──→ done (satisfied / stagnated / max rounds)
//! │      ↓ yes
//! └── refine (thinker, aimed at the weakest dimension)
//! ```

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::worker_gateway::WorkerGateway;
use crate::use_cases::shared::{CallResult, invoke_validated, log_failure};
use philosopher_domain::context::broker;
use philosopher_domain::socratic::MAX_SOCRATIC_ROUNDS;
use philosopher_domain::{
    Answer, BestAnswer, Decision, DomainError, FailureKind, ParticipantId, Phase, PhaseFailure,
    QaEntry, QualityPolicy, SocraticSession, TerminationState, Topic, Verdict, WorkerRequest,
    WorkerResponse,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum RunSocraticError {
    #[error("The thinker produced no initial answer: {0}")]
    NoInitialAnswer(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunSocratic use case
#[derive(Debug, Clone)]
pub struct RunSocraticInput {
    pub question: Topic,
    pub policy: QualityPolicy,
    /// Let refinement rounds search again
    pub allow_re_research: bool,
}

impl RunSocraticInput {
    pub fn new(question: Topic) -> Self {
        Self {
            question,
            policy: QualityPolicy::default(),
            allow_re_research: false,
        }
    }

    pub fn with_policy(mut self, policy: QualityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_re_research(mut self, allow: bool) -> Self {
        self.allow_re_research = allow;
        self
    }
}

/// Everything a finished Socratic run produced
#[derive(Debug, Clone, Serialize)]
pub struct SocraticReport {
    pub question: Topic,
    pub termination: TerminationState,
    pub rounds_completed: u32,
    /// The thinker's answer when the loop stopped
    pub final_answer: Option<Answer>,
    /// The highest-scoring answer of the run
    pub best_answer: Option<BestAnswer>,
    pub qa_history: Vec<QaEntry>,
    pub score_history: Vec<f64>,
    pub verdicts: Vec<Verdict>,
    pub failures: Vec<PhaseFailure>,
}

/// Use case for running a Socratic dialogue
pub struct RunSocraticUseCase<G: WorkerGateway + 'static> {
    gateway: Arc<G>,
    conversation_logger: Arc<dyn ConversationLogger>,
    params: ExecutionParams,
}

impl<G: WorkerGateway + 'static> RunSocraticUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            conversation_logger: Arc::new(NoConversationLogger),
            params: ExecutionParams::default(),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunSocraticInput) -> Result<SocraticReport, RunSocraticError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: RunSocraticInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<SocraticReport, RunSocraticError> {
        let mut session = SocraticSession::new(
            input.question,
            ParticipantId::thinker(),
            ParticipantId::questioner(),
        )?;
        let policy = input.policy;
        let max_rounds = policy.max_rounds.min(MAX_SOCRATIC_ROUNDS);
        info!("Starting Socratic dialogue: {}", session.question());

        // Initial analysis: no answer, no loop
        session.begin_phase(Phase::InitialAnalysis)?;
        progress.on_phase_start(&Phase::InitialAnalysis, None, 1);
        let request = broker::initial_analysis_request(&session, true);
        match self.call(request, progress).await {
            Ok(WorkerResponse::Answer(answer)) => session.record_answer(answer)?,
            Ok(other) => {
                return Err(RunSocraticError::NoInitialAnswer(format!(
                    "unexpected {} response",
                    other.schema()
                )));
            }
            Err(failure) => {
                log_failure(self.conversation_logger.as_ref(), &failure);
                return Err(RunSocraticError::NoInitialAnswer(failure.message));
            }
        }
        progress.on_phase_complete(&Phase::InitialAnalysis);

        loop {
            let round = session.next_round()?;

            // Evaluate
            session.begin_phase(Phase::Evaluate)?;
            progress.on_phase_start(&Phase::Evaluate, Some(round), 1);
            let request = broker::evaluate_request(&session)?;
            let report = match self.call(request, progress).await {
                Ok(WorkerResponse::Evaluation(report)) => Some(report),
                Ok(other) => {
                    let failure = unexpected(session.questioner(), Phase::Evaluate, round, &other);
                    self.contain(&mut session, failure);
                    None
                }
                Err(failure) => {
                    self.contain(&mut session, failure);
                    None
                }
            };
            progress.on_phase_complete(&Phase::Evaluate);

            let Some(report) = report else {
                // A failed evaluation still uses up the round
                if round >= max_rounds {
                    session.terminate(TerminationState::MaxRoundsReached)?;
                    break;
                }
                warn!("Evaluation of round {} failed; evaluating again", round);
                continue;
            };

            let verdict = policy.decide(&report.scores, session.score_history(), round);
            session.record_evaluation(report.scores, report.follow_up_question)?;
            session.record_verdict(verdict);
            info!(
                "Round {}: average {:.3} → {:?}",
                round, verdict.average, verdict.decision
            );
            self.conversation_logger.log(ConversationEvent::new(
                "quality_decision",
                serde_json::json!(verdict),
            ));
            progress.on_quality_decision(&verdict);

            let target = match verdict.decision {
                Decision::Stop { state } => {
                    session.terminate(state)?;
                    break;
                }
                Decision::Continue { target } => target,
            };

            // Refine
            session.begin_phase(Phase::Refine)?;
            progress.on_phase_start(&Phase::Refine, Some(round), 1);
            let request = broker::refine_request(&session, target, input.allow_re_research)?;
            match self.call(request, progress).await {
                Ok(WorkerResponse::Answer(answer)) => session.record_answer(answer)?,
                Ok(other) => {
                    let failure = unexpected(session.thinker(), Phase::Refine, round, &other);
                    self.contain(&mut session, failure);
                }
                // The previous answer stays current
                Err(failure) => self.contain(&mut session, failure),
            }
            progress.on_phase_complete(&Phase::Refine);
        }

        self.conversation_logger.log(ConversationEvent::new(
            "session_terminated",
            serde_json::json!({
                "mode": "socratic",
                "state": session.termination(),
                "rounds": session.round(),
            }),
        ));
        info!(
            "Socratic dialogue finished after {} round(s): {}",
            session.round(),
            session.termination()
        );

        Ok(SocraticReport {
            question: session.question().clone(),
            termination: session.termination(),
            rounds_completed: session.round(),
            final_answer: session.current_answer().cloned(),
            best_answer: session.best_answer().cloned(),
            qa_history: session.qa_history().to_vec(),
            score_history: session.score_history().to_vec(),
            verdicts: session.verdicts().to_vec(),
            failures: session.failures().to_vec(),
        })
    }

    async fn call(&self, request: WorkerRequest, progress: &dyn ProgressNotifier) -> CallResult {
        let phase = request.phase;
        let participant = request.participant.clone();
        let result = invoke_validated(
            self.gateway.as_ref(),
            self.conversation_logger.as_ref(),
            request,
            self.params.budgets.socratic_call,
            self.params.max_schema_retries,
        )
        .await;
        progress.on_task_complete(&phase, &participant, result.is_ok());
        result
    }

    fn contain(&self, session: &mut SocraticSession, failure: PhaseFailure) {
        log_failure(self.conversation_logger.as_ref(), &failure);
        session.record_failure(failure);
    }
}

fn unexpected(
    participant: &ParticipantId,
    phase: Phase,
    round: u32,
    response: &WorkerResponse,
) -> PhaseFailure {
    PhaseFailure::new(
        participant.clone(),
        phase,
        Some(round),
        FailureKind::SchemaValidation,
        format!("unexpected {} response", response.schema()),
    )
}
