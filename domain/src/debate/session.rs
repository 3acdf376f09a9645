//! Debate session state (Entity)
//!
//! The single mutable record of a debate. Only the driving use case holds a
//! `&mut DebateSession`; every helper (context broker, scheduler, consensus
//! extractor) takes `&DebateSession` and never mutates it.

use super::artifacts::{PreparationRecord, ResearchRecord};
use super::schedule::{Coercion, DEBATE_ROUNDS};
use super::utterance::{ActionKind, StanceSummary, Utterance};
use crate::core::error::DomainError;
use crate::core::participant::{ParticipantId, Viewpoint};
use crate::core::topic::Topic;
use crate::providers::Provider;
use crate::session::{Phase, PhaseFailure, TerminationState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Minimum number of debaters
pub const MIN_PARTICIPANTS: usize = 2;

/// A debater bound to its viewpoint (and optionally a provider)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub viewpoint: Viewpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
}

impl Participant {
    pub fn new(id: ParticipantId, viewpoint: impl Into<String>) -> Self {
        Self {
            id,
            viewpoint: Viewpoint::new(viewpoint),
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }
}

/// The state of one debate run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateSession {
    topic: Topic,
    participants: Vec<Participant>,
    phase: Option<Phase>,
    round: u32,
    research: BTreeMap<ParticipantId, ResearchRecord>,
    preparation: BTreeMap<ParticipantId, PreparationRecord>,
    history: Vec<Utterance>,
    stances: Vec<StanceSummary>,
    failures: Vec<PhaseFailure>,
    coercions: Vec<Coercion>,
    termination: TerminationState,
}

impl DebateSession {
    /// Create a session; participant order is the canonical speaking order
    pub fn new(topic: Topic, participants: Vec<Participant>) -> Result<Self, DomainError> {
        if participants.len() < MIN_PARTICIPANTS {
            return Err(DomainError::NotEnoughParticipants {
                required: MIN_PARTICIPANTS,
                actual: participants.len(),
            });
        }

        let mut seen = HashSet::new();
        for p in &participants {
            if !seen.insert(p.id.clone()) {
                return Err(DomainError::DuplicateParticipant(p.id.clone()));
            }
        }

        Ok(Self {
            topic,
            participants,
            phase: None,
            round: 0,
            research: BTreeMap::new(),
            preparation: BTreeMap::new(),
            history: Vec::new(),
            stances: Vec::new(),
            failures: Vec::new(),
            coercions: Vec::new(),
            termination: TerminationState::Running,
        })
    }

    // ==================== Accessors ====================

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn participant(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.id == id)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.participant(id).is_some()
    }

    /// Participant ids in canonical order
    pub fn canonical_order(&self) -> Vec<ParticipantId> {
        self.participants.iter().map(|p| p.id.clone()).collect()
    }

    /// Participants whose research survived, in canonical order.
    ///
    /// Only these take part in preparation and the debate rounds.
    pub fn debaters(&self) -> Vec<ParticipantId> {
        self.participants
            .iter()
            .filter(|p| self.research.contains_key(&p.id))
            .map(|p| p.id.clone())
            .collect()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn research(&self, id: &ParticipantId) -> Option<&ResearchRecord> {
        self.research.get(id)
    }

    pub fn all_research(&self) -> &BTreeMap<ParticipantId, ResearchRecord> {
        &self.research
    }

    pub fn preparation(&self, id: &ParticipantId) -> Option<&PreparationRecord> {
        self.preparation.get(id)
    }

    pub fn history(&self) -> &[Utterance] {
        &self.history
    }

    pub fn stances(&self) -> &[StanceSummary] {
        &self.stances
    }

    pub fn failures(&self) -> &[PhaseFailure] {
        &self.failures
    }

    pub fn coercions(&self) -> &[Coercion] {
        &self.coercions
    }

    pub fn termination(&self) -> TerminationState {
        self.termination
    }

    /// Whether any utterance of `round` has already been committed
    pub fn round_has_utterances(&self, round: u32) -> bool {
        self.history.iter().any(|u| u.round == round)
    }

    // ==================== Mutations (orchestrator only) ====================

    /// Enter a phase. Debate rounds must advance one at a time.
    pub fn begin_phase(&mut self, phase: Phase, round: u32) -> Result<(), DomainError> {
        self.ensure_running()?;
        if phase == Phase::Debate {
            if round == 0 || round > DEBATE_ROUNDS || round != self.round + 1 {
                return Err(DomainError::CorruptSession(format!(
                    "cannot enter debate round {} after round {}",
                    round, self.round
                )));
            }
            self.round = round;
        }
        self.phase = Some(phase);
        Ok(())
    }

    pub fn record_research(
        &mut self,
        id: &ParticipantId,
        record: ResearchRecord,
    ) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.ensure_member(id)?;
        if self.research.contains_key(id) {
            return Err(DomainError::CorruptSession(format!(
                "research for {} submitted twice",
                id
            )));
        }
        self.research.insert(id.clone(), record);
        Ok(())
    }

    pub fn record_preparation(
        &mut self,
        id: &ParticipantId,
        record: PreparationRecord,
    ) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.ensure_member(id)?;
        if self.preparation.contains_key(id) {
            return Err(DomainError::CorruptSession(format!(
                "preparation for {} submitted twice",
                id
            )));
        }
        self.preparation.insert(id.clone(), record);
        Ok(())
    }

    /// Append an utterance to the history.
    ///
    /// Rejects anything that would break the ordering or the
    /// opening-utterance invariant; the scheduler coerces actions before
    /// they get here, so a rejection means the orchestrator is broken.
    pub fn append_utterance(&mut self, utterance: Utterance) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.ensure_member(&utterance.speaker)?;

        if utterance.round != self.round || self.phase != Some(Phase::Debate) {
            return Err(DomainError::CorruptSession(format!(
                "utterance for round {} while in round {}",
                utterance.round, self.round
            )));
        }
        if let Some(last) = self.history.last()
            && (last.round, last.turn) > (utterance.round, utterance.turn)
        {
            return Err(DomainError::CorruptSession(format!(
                "utterance ({}, {}) emitted after ({}, {})",
                utterance.round, utterance.turn, last.round, last.turn
            )));
        }
        if utterance.action == ActionKind::Defend && !self.round_has_utterances(utterance.round) {
            return Err(DomainError::CorruptSession(format!(
                "round {} cannot open with a defense",
                utterance.round
            )));
        }

        self.history.push(utterance);
        Ok(())
    }

    pub fn record_stance(&mut self, stance: StanceSummary) -> Result<(), DomainError> {
        self.ensure_running()?;
        self.ensure_member(&stance.participant)?;
        self.stances.retain(|s| s.participant != stance.participant);
        self.stances.push(stance);
        Ok(())
    }

    pub fn record_failure(&mut self, failure: PhaseFailure) {
        self.failures.push(failure);
    }

    pub fn record_coercion(&mut self, coercion: Coercion) {
        self.coercions.push(coercion);
    }

    /// Leave the running state. A second call is a corruption.
    pub fn terminate(&mut self, state: TerminationState) -> Result<(), DomainError> {
        if state.is_running() {
            return Err(DomainError::CorruptSession(
                "cannot terminate into the running state".into(),
            ));
        }
        self.ensure_running()?;
        self.termination = state;
        self.phase = Some(Phase::Conclusion);
        Ok(())
    }

    fn ensure_running(&self) -> Result<(), DomainError> {
        if self.termination.is_running() {
            Ok(())
        } else {
            Err(DomainError::SessionTerminated(self.termination))
        }
    }

    fn ensure_member(&self, id: &ParticipantId) -> Result<(), DomainError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(DomainError::UnknownParticipant(id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParticipantId {
        s.parse().unwrap()
    }

    fn session() -> DebateSession {
        DebateSession::new(
            Topic::new("Monolith vs microservices").unwrap(),
            vec![
                Participant::new(id("A"), "Monolith first"),
                Participant::new(id("B"), "Microservices"),
                Participant::new(id("C"), "Modular monolith"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_requires_two_participants() {
        let result = DebateSession::new(
            Topic::new("x y z").unwrap(),
            vec![Participant::new(id("A"), "v")],
        );
        assert!(matches!(
            result,
            Err(DomainError::NotEnoughParticipants { required: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_rejects_duplicate_participants() {
        let result = DebateSession::new(
            Topic::new("x y z").unwrap(),
            vec![Participant::new(id("A"), "v"), Participant::new(id("A"), "w")],
        );
        assert!(matches!(result, Err(DomainError::DuplicateParticipant(_))));
    }

    #[test]
    fn test_research_is_write_once() {
        let mut s = session();
        s.record_research(&id("A"), ResearchRecord::new("t")).unwrap();
        let err = s.record_research(&id("A"), ResearchRecord::new("t2"));
        assert!(matches!(err, Err(DomainError::CorruptSession(_))));
        assert_eq!(s.research(&id("A")).unwrap().core_thesis, "t");
    }

    #[test]
    fn test_rounds_advance_one_at_a_time() {
        let mut s = session();
        assert!(s.begin_phase(Phase::Debate, 2).is_err());
        s.begin_phase(Phase::Debate, 1).unwrap();
        s.begin_phase(Phase::Debate, 2).unwrap();
        assert_eq!(s.round(), 2);
    }

    #[test]
    fn test_round_cannot_open_with_defense() {
        let mut s = session();
        s.begin_phase(Phase::Debate, 1).unwrap();
        let defend = Utterance::new(1, 0, id("A"), ActionKind::Defend, "c", "k");
        assert!(s.append_utterance(defend).is_err());

        let attack = Utterance::new(1, 0, id("A"), ActionKind::Attack, "c", "k");
        s.append_utterance(attack).unwrap();
        let defend = Utterance::new(1, 1, id("B"), ActionKind::Defend, "c", "k");
        s.append_utterance(defend).unwrap();
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_out_of_order_utterance_rejected() {
        let mut s = session();
        s.begin_phase(Phase::Debate, 1).unwrap();
        s.append_utterance(Utterance::new(1, 1, id("B"), ActionKind::Support, "c", "k"))
            .unwrap();
        let late = Utterance::new(1, 0, id("A"), ActionKind::Support, "c", "k");
        assert!(s.append_utterance(late).is_err());
    }

    #[test]
    fn test_termination_is_monotonic() {
        let mut s = session();
        s.terminate(TerminationState::MaxRoundsReached).unwrap();
        assert_eq!(s.termination(), TerminationState::MaxRoundsReached);
        assert!(matches!(
            s.terminate(TerminationState::Satisfied),
            Err(DomainError::SessionTerminated(TerminationState::MaxRoundsReached))
        ));
        assert!(s.record_research(&id("B"), ResearchRecord::new("t")).is_err());
    }
}
