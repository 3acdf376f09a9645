//! Run Debate use case
//!
//! Drives a debate through its phases:
//!
//! 1. research (parallel, join barrier)
//! 2. preparation (parallel, join barrier)
//! 3. rounds 1..=3 (sequential turns, rotated speaker order)
//! 4. conclusion (consensus extraction, one escalation of unresolved points)
//!
//! The use case is the only writer of the session. Scheduling, visibility
//! and consensus rules come from the domain; this module only sequences
//! worker calls and commits their results.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::decision::{
    DecisionIssue, DecisionOption, DecisionOutcome, DecisionPort, DecisionRecord, DeferDecision,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::worker_gateway::WorkerGateway;
use crate::use_cases::resolve_providers::ProviderSubstitution;
use crate::use_cases::shared::{fan_out, invoke_validated, log_failure};
use philosopher_domain::context::broker;
use philosopher_domain::debate::consensus::extract_consensus;
use philosopher_domain::debate::schedule::{admit_turn, round_has_prior, round_slots, speaker_order};
use philosopher_domain::{
    Coercion, ConsensusReport, DEBATE_ROUNDS, DebateSession, DomainError, FailureKind,
    Participant, ParticipantId, Phase, PhaseFailure, ResearchRecord, StanceSummary,
    TerminationState, Topic, UnresolvedPoint, Utterance, WorkerResponse,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a debate
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("No participant produced research; the debate cannot continue")]
    NoSurvivors,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub topic: Topic,
    /// Canonical speaking order
    pub participants: Vec<Participant>,
    /// Provider substitutions made before the run, copied to the report
    pub substitutions: Vec<ProviderSubstitution>,
}

impl RunDebateInput {
    pub fn new(topic: Topic, participants: Vec<Participant>) -> Self {
        Self {
            topic,
            participants,
            substitutions: Vec::new(),
        }
    }

    pub fn with_substitutions(mut self, substitutions: Vec<ProviderSubstitution>) -> Self {
        self.substitutions = substitutions;
        self
    }
}

/// Everything a finished debate produced
#[derive(Debug, Clone, Serialize)]
pub struct DebateReport {
    pub topic: Topic,
    pub participants: Vec<Participant>,
    pub termination: TerminationState,
    pub rounds_completed: u32,
    pub research: BTreeMap<ParticipantId, ResearchRecord>,
    pub history: Vec<Utterance>,
    pub stances: Vec<StanceSummary>,
    pub consensus: ConsensusReport,
    pub decisions: Vec<DecisionRecord>,
    pub failures: Vec<PhaseFailure>,
    pub coercions: Vec<Coercion>,
    pub substitutions: Vec<ProviderSubstitution>,
}

impl DebateReport {
    /// Whether any contribution is missing or was rewritten
    pub fn is_degraded(&self) -> bool {
        !self.failures.is_empty() || !self.coercions.is_empty()
    }

    pub fn timeouts(&self) -> impl Iterator<Item = &PhaseFailure> {
        self.failures
            .iter()
            .filter(|f| f.kind == FailureKind::WorkerTimeout)
    }
}

/// Use case for running a debate
pub struct RunDebateUseCase<G: WorkerGateway + 'static> {
    gateway: Arc<G>,
    conversation_logger: Arc<dyn ConversationLogger>,
    decision: Arc<dyn DecisionPort>,
    params: ExecutionParams,
}

impl<G: WorkerGateway + 'static> RunDebateUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            conversation_logger: Arc::new(NoConversationLogger),
            decision: Arc::new(DeferDecision),
            params: ExecutionParams::default(),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_decision_port(mut self, decision: Arc<dyn DecisionPort>) -> Self {
        self.decision = decision;
        self
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunDebateInput) -> Result<DebateReport, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DebateReport, RunDebateError> {
        let mut session = DebateSession::new(input.topic, input.participants)?;
        info!(
            "Starting debate with {} participants: {}",
            session.participants().len(),
            session.topic()
        );

        self.phase_research(&mut session, progress).await?;
        if session.debaters().is_empty() {
            return Err(RunDebateError::NoSurvivors);
        }

        self.phase_preparation(&mut session, progress).await?;

        for round in 1..=DEBATE_ROUNDS {
            self.debate_round(&mut session, round, progress).await?;
        }

        session.terminate(TerminationState::MaxRoundsReached)?;
        self.conversation_logger.log(ConversationEvent::new(
            "session_terminated",
            serde_json::json!({
                "mode": "debate",
                "state": session.termination(),
                "rounds": session.round(),
            }),
        ));

        progress.on_phase_start(&Phase::Conclusion, None, 1);
        let consensus = extract_consensus(session.history(), session.stances());
        info!(
            "Consensus: {} agreed, {} unresolved, {} standing",
            consensus.agreed.len(),
            consensus.unresolved.len(),
            consensus.standing.len()
        );
        let decisions = self.escalate(&session, &consensus.unresolved).await;
        progress.on_phase_complete(&Phase::Conclusion);

        Ok(DebateReport {
            topic: session.topic().clone(),
            participants: session.participants().to_vec(),
            termination: session.termination(),
            rounds_completed: session.round(),
            research: session.all_research().clone(),
            history: session.history().to_vec(),
            stances: session.stances().to_vec(),
            consensus,
            decisions,
            failures: session.failures().to_vec(),
            coercions: session.coercions().to_vec(),
            substitutions: input.substitutions,
        })
    }

    /// Phase 1: every participant researches its own viewpoint in parallel
    async fn phase_research(
        &self,
        session: &mut DebateSession,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), RunDebateError> {
        info!("Phase 1: Research");
        session.begin_phase(Phase::Research, 0)?;
        let requests = session
            .canonical_order()
            .iter()
            .map(|id| broker::research_request(session, id))
            .collect::<Result<Vec<_>, _>>()?;
        progress.on_phase_start(&Phase::Research, None, requests.len());

        let results = fan_out(
            &self.gateway,
            &self.conversation_logger,
            requests,
            self.params.budgets.research,
            self.params.max_schema_retries,
            self.params.barrier_deadline(Phase::Research),
            progress,
        )
        .await;

        for (participant, result) in results {
            match result {
                Ok(WorkerResponse::Research(mut record)) => {
                    if record.viewpoint.trim().is_empty()
                        && let Some(p) = session.participant(&participant)
                    {
                        record.viewpoint = p.viewpoint.as_str().to_string();
                    }
                    session.record_research(&participant, record)?;
                }
                Ok(other) => self.contain(
                    session,
                    unexpected(&participant, Phase::Research, None, &other),
                ),
                Err(failure) => self.contain(session, failure),
            }
        }

        progress.on_phase_complete(&Phase::Research);
        Ok(())
    }

    /// Phase 2: surviving participants plan against each other's research
    async fn phase_preparation(
        &self,
        session: &mut DebateSession,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), RunDebateError> {
        info!("Phase 2: Preparation");
        session.begin_phase(Phase::Preparation, 0)?;
        let requests = session
            .debaters()
            .iter()
            .map(|id| broker::preparation_request(session, id))
            .collect::<Result<Vec<_>, _>>()?;
        progress.on_phase_start(&Phase::Preparation, None, requests.len());

        let results = fan_out(
            &self.gateway,
            &self.conversation_logger,
            requests,
            self.params.budgets.preparation,
            self.params.max_schema_retries,
            self.params.barrier_deadline(Phase::Preparation),
            progress,
        )
        .await;

        for (participant, result) in results {
            match result {
                Ok(WorkerResponse::Preparation(record)) => {
                    session.record_preparation(&participant, record)?;
                }
                Ok(other) => self.contain(
                    session,
                    unexpected(&participant, Phase::Preparation, None, &other),
                ),
                Err(failure) => self.contain(session, failure),
            }
        }

        progress.on_phase_complete(&Phase::Preparation);
        Ok(())
    }

    /// One debate round: turn k+1 is dispatched only after turn k is committed
    async fn debate_round(
        &self,
        session: &mut DebateSession,
        round: u32,
        progress: &dyn ProgressNotifier,
    ) -> Result<(), RunDebateError> {
        session.begin_phase(Phase::Debate, round)?;
        let debaters = session.debaters();
        let order = speaker_order(&debaters, round);
        info!(
            "Round {}: {}",
            round,
            order
                .iter()
                .map(|p| p.as_str())
                .collect::<Vec<_>>()
                .join(" → ")
        );
        progress.on_phase_start(&Phase::Debate, Some(round), order.len());

        for slot in round_slots(&debaters, round) {
            let request = broker::turn_request(session, &slot)?;
            let has_prior = round_has_prior(session.history(), round, slot.turn);

            let result = invoke_validated(
                self.gateway.as_ref(),
                self.conversation_logger.as_ref(),
                request,
                self.params.budgets.debate_turn,
                self.params.max_schema_retries,
            )
            .await;

            let turn = match result {
                Ok(WorkerResponse::Turn(turn)) => turn,
                Ok(other) => {
                    self.contain(
                        session,
                        unexpected(&slot.speaker, Phase::Debate, Some(round), &other),
                    );
                    progress.on_task_complete(&Phase::Debate, &slot.speaker, false);
                    continue;
                }
                Err(failure) => {
                    self.contain(session, failure);
                    progress.on_task_complete(&Phase::Debate, &slot.speaker, false);
                    continue;
                }
            };

            let admitted = admit_turn(&slot, &turn.actions, &order, has_prior);
            for dropped in &admitted.dropped_targets {
                debug!("Dropped invalid target {:?} from {}", dropped, slot.speaker);
            }
            for coercion in admitted.coercions {
                warn!(
                    "Coerced {} → {} for {} in round {} ({})",
                    coercion.from, coercion.to, coercion.speaker, coercion.round, coercion.reason
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "coercion",
                    serde_json::json!(coercion),
                ));
                progress.on_coercion(&coercion);
                session.record_coercion(coercion);
            }
            for utterance in admitted.utterances {
                session.append_utterance(utterance)?;
            }
            if slot.is_final
                && let Some(stance) = turn.stance(&slot.speaker)
            {
                session.record_stance(stance)?;
            }
            progress.on_task_complete(&Phase::Debate, &slot.speaker, true);
        }

        progress.on_phase_complete(&Phase::Debate);
        Ok(())
    }

    /// Put the unresolved points to the decision port, once.
    ///
    /// A failing decision port leaves every point open.
    async fn escalate(
        &self,
        session: &DebateSession,
        unresolved: &[UnresolvedPoint],
    ) -> Vec<DecisionRecord> {
        if unresolved.is_empty() {
            return Vec::new();
        }

        let issues: Vec<DecisionIssue> = unresolved
            .iter()
            .map(|point| DecisionIssue {
                point: point.point.clone(),
                reasons: point.reasons.clone(),
                options: positions(session),
            })
            .collect();

        let outcomes = match self.decision.decide(&issues).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                warn!("Decision failed, leaving points open: {}", e);
                Vec::new()
            }
        };

        let records: Vec<DecisionRecord> = issues
            .iter()
            .enumerate()
            .map(|(i, issue)| DecisionRecord {
                point: issue.point.clone(),
                outcome: outcomes
                    .get(i)
                    .cloned()
                    .unwrap_or(DecisionOutcome::NeedsMoreDiscussion),
            })
            .collect();

        self.conversation_logger.log(ConversationEvent::new(
            "decision",
            serde_json::json!({ "issues": issues, "decisions": records }),
        ));
        records
    }

    fn contain(&self, session: &mut DebateSession, failure: PhaseFailure) {
        log_failure(self.conversation_logger.as_ref(), &failure);
        session.record_failure(failure);
    }
}

/// Each debater's final position: stance summary, else latest key point
fn positions(session: &DebateSession) -> Vec<DecisionOption> {
    session
        .debaters()
        .into_iter()
        .filter_map(|participant| {
            let stance = session
                .stances()
                .iter()
                .find(|s| s.participant == participant)
                .map(|s| s.summary.clone())
                .filter(|s| !s.trim().is_empty());
            let latest = session
                .history()
                .iter()
                .rev()
                .find(|u| u.speaker == participant)
                .map(|u| u.key_point.clone());
            stance.or(latest).map(|position| DecisionOption {
                participant,
                position,
            })
        })
        .collect()
}

fn unexpected(
    participant: &ParticipantId,
    phase: Phase,
    round: Option<u32>,
    response: &WorkerResponse,
) -> PhaseFailure {
    PhaseFailure::new(
        participant.clone(),
        phase,
        round,
        FailureKind::SchemaValidation,
        format!("unexpected {} response", response.schema()),
    )
}
