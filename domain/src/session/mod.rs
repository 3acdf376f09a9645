//! Session-wide concepts shared by the debate and Socratic modes.
//!
//! - [`TerminationState`]: monotonic loop status
//! - [`Phase`]: the step a worker call belongs to
//! - [`PhaseFailure`]: a contained per-call failure surfaced in the report

use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Status of a session's iteration loop.
///
/// Monotonic: once a session leaves `Running` it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TerminationState {
    #[default]
    Running,
    Satisfied,
    Stagnated,
    MaxRoundsReached,
}

impl TerminationState {
    pub fn is_running(&self) -> bool {
        matches!(self, TerminationState::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminationState::Running => "running",
            TerminationState::Satisfied => "satisfied",
            TerminationState::Stagnated => "stagnated",
            TerminationState::MaxRoundsReached => "max_rounds_reached",
        }
    }
}

impl std::fmt::Display for TerminationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The step of a session a worker call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Debate: parallel evidence gathering, no shared history
    Research,
    /// Debate: parallel planning against the other participants' research
    Preparation,
    /// Debate: one strictly sequential round of turns
    Debate,
    /// Debate: consensus extraction, never a worker call
    Conclusion,
    /// Socratic: the thinker's first answer
    InitialAnalysis,
    /// Socratic: the questioner scores the current answer
    Evaluate,
    /// Socratic: the thinker answers the newest follow-up question
    Refine,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Research => "research",
            Phase::Preparation => "preparation",
            Phase::Debate => "debate",
            Phase::Conclusion => "conclusion",
            Phase::InitialAnalysis => "initial_analysis",
            Phase::Evaluate => "evaluate",
            Phase::Refine => "refine",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Phase::Research => "Research",
            Phase::Preparation => "Preparation",
            Phase::Debate => "Debate Round",
            Phase::Conclusion => "Conclusion",
            Phase::InitialAnalysis => "Initial Analysis",
            Phase::Evaluate => "Evaluation",
            Phase::Refine => "Refinement",
        }
    }

    /// Phases whose calls fan out in parallel behind a join barrier
    pub fn is_parallel(&self) -> bool {
        matches!(self, Phase::Research | Phase::Preparation)
    }

    /// Phases in which a worker may use the external search tool
    pub fn allows_search(&self) -> bool {
        matches!(self, Phase::Research | Phase::Preparation)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Why a participant's contribution is missing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The response failed schema validation twice
    SchemaValidation,
    /// The gateway reported an error
    WorkerFailure,
    /// The phase budget ran out before the worker answered
    WorkerTimeout,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::SchemaValidation => "schema validation failure",
            FailureKind::WorkerFailure => "worker failure",
            FailureKind::WorkerTimeout => "worker timeout",
        };
        write!(f, "{}", s)
    }
}

/// A contained per-call failure; the phase proceeds without this contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseFailure {
    pub participant: ParticipantId,
    pub phase: Phase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    pub kind: FailureKind,
    pub message: String,
}

impl PhaseFailure {
    pub fn new(
        participant: ParticipantId,
        phase: Phase,
        round: Option<u32>,
        kind: FailureKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            participant,
            phase,
            round,
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_default_is_running() {
        assert!(TerminationState::default().is_running());
        assert!(!TerminationState::Stagnated.is_running());
    }

    #[test]
    fn test_phase_parallelism() {
        assert!(Phase::Research.is_parallel());
        assert!(Phase::Preparation.is_parallel());
        assert!(!Phase::Debate.is_parallel());
        assert!(!Phase::Refine.is_parallel());
    }

    #[test]
    fn test_termination_serializes_snake_case() {
        let json = serde_json::to_string(&TerminationState::MaxRoundsReached).unwrap();
        assert_eq!(json, "\"max_rounds_reached\"");
    }
}
