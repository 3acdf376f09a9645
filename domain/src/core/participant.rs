//! Participant value objects

use serde::{Deserialize, Serialize};

/// Opaque identifier of a worker taking part in a session (Value Object)
///
/// Stable for the whole session. Debates conventionally use `"A"`, `"B"`,
/// `"C"`; Socratic sessions use `"thinker"` and `"questioner"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Try to create an identifier, returning None for blank input
    pub fn try_new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Identifier of the Socratic thinker
    pub fn thinker() -> Self {
        Self("thinker".to_string())
    }

    /// Identifier of the Socratic questioner
    pub fn questioner() -> Self {
        Self("questioner".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ParticipantId {
    type Err = crate::core::error::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s).ok_or_else(|| crate::core::error::DomainError::InvalidParticipant(s.into()))
    }
}

/// The stance assigned to a debater for the whole session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Viewpoint(String);

impl Viewpoint {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Viewpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a participant does in a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Debater,
    Thinker,
    Questioner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Debater => "debater",
            Role::Thinker => "thinker",
            Role::Questioner => "questioner",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
