//! The exact payload a worker receives for one call.

use super::response::ResponseSchema;
use crate::core::participant::{ParticipantId, Role};
use crate::debate::{ActionKind, PreparationRecord, ResearchRecord, Utterance};
use crate::session::Phase;
use crate::socratic::{Answer, Dimension, QaEntry};
use serde::{Deserialize, Serialize};

/// What the worker is allowed or asked to do in this call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Empty outside debate rounds
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_actions: Vec<ActionKind>,
    #[serde(default)]
    pub is_final: bool,
    /// Invite (not require) consensus language and a closing stance
    #[serde(default)]
    pub propose_consensus: bool,
    #[serde(default)]
    pub allow_search: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_dimension: Option<Dimension>,
}

/// The worker's own earlier artifacts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnArtifacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research: Option<ResearchRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<PreparationRecord>,
}

/// Another debater's research, shown verbatim during preparation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeerResearch {
    pub participant: ParticipantId,
    pub viewpoint: String,
    pub research: ResearchRecord,
}

/// Material from outside the worker's own artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisibleContext {
    Nothing,
    PeerResearch {
        peers: Vec<PeerResearch>,
    },
    DebateHistory {
        utterances: Vec<Utterance>,
    },
    QaLoop {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        answer: Option<Answer>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        follow_up: Option<String>,
        qa_history: Vec<QaEntry>,
    },
}

impl VisibleContext {
    /// Utterances carried by a debate view, empty otherwise
    pub fn utterances(&self) -> &[Utterance] {
        match self {
            VisibleContext::DebateHistory { utterances } => utterances,
            _ => &[],
        }
    }
}

/// A single worker call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub participant: ParticipantId,
    pub role: Role,
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<u32>,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewpoint: Option<String>,
    pub expected_schema: ResponseSchema,
    pub constraints: Constraints,
    pub own_artifacts: OwnArtifacts,
    pub visible: VisibleContext,
    /// Set on the single retry after a schema failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification: Option<String>,
}

impl WorkerRequest {
    pub fn with_clarification(mut self, clarification: impl Into<String>) -> Self {
        self.clarification = Some(clarification.into());
        self
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
