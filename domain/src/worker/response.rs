//! Structured worker responses, one shape per phase.

use crate::core::participant::ParticipantId;
use crate::debate::{ActionKind, PreparationRecord, ResearchRecord, StanceSummary};
use crate::session::Phase;
use crate::socratic::{Answer, Evaluation};
use serde::{Deserialize, Serialize};

/// The JSON shape a phase expects back from its worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSchema {
    Research,
    Preparation,
    Turn,
    Answer,
    Evaluation,
}

impl ResponseSchema {
    /// Schema for a phase; `None` for phases that never call a worker
    pub fn for_phase(phase: Phase) -> Option<Self> {
        match phase {
            Phase::Research => Some(Self::Research),
            Phase::Preparation => Some(Self::Preparation),
            Phase::Debate => Some(Self::Turn),
            Phase::InitialAnalysis | Phase::Refine => Some(Self::Answer),
            Phase::Evaluate => Some(Self::Evaluation),
            Phase::Conclusion => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Preparation => "preparation",
            Self::Turn => "turn",
            Self::Answer => "answer",
            Self::Evaluation => "evaluation",
        }
    }
}

impl std::fmt::Display for ResponseSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One action inside a debate turn, as the worker wrote it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnAction {
    #[serde(rename = "type")]
    pub kind: ActionKind,
    /// Raw participant id; validated by the scheduler
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub content: String,
    pub key_point: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_point: Option<String>,
}

/// A debater's turn: one or more actions plus, in the final round, a stance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebateTurn {
    pub actions: Vec<TurnAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stance_summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_proposal: Option<String>,
    #[serde(default)]
    pub endorsed_points: Vec<String>,
    #[serde(default)]
    pub rejected_points: Vec<String>,
}

impl DebateTurn {
    /// The closing stance carried by this turn, if the worker wrote any
    pub fn stance(&self, participant: &ParticipantId) -> Option<StanceSummary> {
        let summary = self.stance_summary.clone().unwrap_or_default();
        if summary.trim().is_empty()
            && self.consensus_proposal.is_none()
            && self.endorsed_points.is_empty()
            && self.rejected_points.is_empty()
        {
            return None;
        }
        Some(StanceSummary {
            participant: participant.clone(),
            summary,
            consensus_proposal: self.consensus_proposal.clone(),
            endorsed_points: self.endorsed_points.clone(),
            rejected_points: self.rejected_points.clone(),
        })
    }
}

/// The questioner's scoring of an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub scores: Evaluation,
    #[serde(default)]
    pub follow_up_question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critique: Option<String>,
}

/// A validated worker response
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    Research(ResearchRecord),
    Preparation(PreparationRecord),
    Turn(DebateTurn),
    Answer(Answer),
    Evaluation(EvaluationReport),
}

impl WorkerResponse {
    pub fn schema(&self) -> ResponseSchema {
        match self {
            WorkerResponse::Research(_) => ResponseSchema::Research,
            WorkerResponse::Preparation(_) => ResponseSchema::Preparation,
            WorkerResponse::Turn(_) => ResponseSchema::Turn,
            WorkerResponse::Answer(_) => ResponseSchema::Answer,
            WorkerResponse::Evaluation(_) => ResponseSchema::Evaluation,
        }
    }
}

/// A validated response plus the worker's self-reported confidence
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub response: WorkerResponse,
    pub confidence: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_for_phase() {
        assert_eq!(
            ResponseSchema::for_phase(Phase::Debate),
            Some(ResponseSchema::Turn)
        );
        assert_eq!(
            ResponseSchema::for_phase(Phase::Refine),
            Some(ResponseSchema::Answer)
        );
        assert_eq!(ResponseSchema::for_phase(Phase::Conclusion), None);
    }

    #[test]
    fn test_stance_absent_without_content() {
        let turn = DebateTurn {
            actions: vec![],
            stance_summary: Some("  ".into()),
            consensus_proposal: None,
            endorsed_points: vec![],
            rejected_points: vec![],
        };
        assert!(turn.stance(&ParticipantId::thinker()).is_none());
    }

    #[test]
    fn test_stance_from_final_turn() {
        let turn: DebateTurn = serde_json::from_str(
            r#"{
                "actions": [{"type": "support", "target": "B", "content": "c", "key_point": "k"}],
                "stance_summary": "Modular first",
                "endorsed_points": ["k"]
            }"#,
        )
        .unwrap();
        let id: ParticipantId = "A".parse().unwrap();
        let stance = turn.stance(&id).unwrap();
        assert_eq!(stance.summary, "Modular first");
        assert_eq!(stance.endorsed_points, vec!["k".to_string()]);
    }
}
