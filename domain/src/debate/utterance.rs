//! Utterances: the append-only record of a debate.

use crate::core::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// What a debate contribution does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Attack,
    Support,
    Defend,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Attack => "attack",
            ActionKind::Support => "support",
            ActionKind::Defend => "defend",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "attack" => Ok(ActionKind::Attack),
            "support" => Ok(ActionKind::Support),
            "defend" => Ok(ActionKind::Defend),
            other => Err(format!("unknown action type {:?}", other)),
        }
    }
}

/// One recorded contribution by a participant in a round
///
/// `turn` is the speaker's 0-based position in the round's speaking order;
/// a turn with several actions yields several utterances sharing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub round: u32,
    pub turn: u32,
    pub speaker: ParticipantId,
    pub action: ActionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ParticipantId>,
    /// The claim this utterance is aimed at, when the speaker named it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_point: Option<String>,
    pub content: String,
    pub key_point: String,
}

impl Utterance {
    pub fn new(
        round: u32,
        turn: u32,
        speaker: ParticipantId,
        action: ActionKind,
        content: impl Into<String>,
        key_point: impl Into<String>,
    ) -> Self {
        Self {
            round,
            turn,
            speaker,
            action,
            target: None,
            target_point: None,
            content: content.into(),
            key_point: key_point.into(),
        }
    }

    pub fn with_target(mut self, target: ParticipantId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_target_point(mut self, point: impl Into<String>) -> Self {
        self.target_point = Some(point.into());
        self
    }

    /// True if this utterance was emitted strictly before `(round, turn)`
    pub fn precedes(&self, round: u32, turn: u32) -> bool {
        self.round < round || (self.round == round && self.turn < turn)
    }
}

/// A participant's closing position, collected in the final round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StanceSummary {
    pub participant: ParticipantId,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_proposal: Option<String>,
    #[serde(default)]
    pub endorsed_points: Vec<String>,
    #[serde(default)]
    pub rejected_points: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> ParticipantId {
        s.parse().unwrap()
    }

    #[test]
    fn test_precedes() {
        let u = Utterance::new(2, 1, id("B"), ActionKind::Attack, "c", "k");
        assert!(u.precedes(2, 2));
        assert!(u.precedes(3, 0));
        assert!(!u.precedes(2, 1));
        assert!(!u.precedes(1, 5));
    }

    #[test]
    fn test_action_kind_parse() {
        assert_eq!("Defend".parse::<ActionKind>().unwrap(), ActionKind::Defend);
        assert!("rebut".parse::<ActionKind>().is_err());
    }
}
