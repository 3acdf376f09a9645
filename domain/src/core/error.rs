//! Domain error types

use crate::core::participant::ParticipantId;
use crate::session::TerminationState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Invalid participant id: {0:?}")]
    InvalidParticipant(String),

    #[error("Participant {0} appears more than once")]
    DuplicateParticipant(ParticipantId),

    #[error("At least {required} participants are required, got {actual}")]
    NotEnoughParticipants { required: usize, actual: usize },

    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    #[error("Session already terminated ({0})")]
    SessionTerminated(TerminationState),

    #[error("Corrupt session state: {0}")]
    CorruptSession(String),
}

impl DomainError {
    /// Errors that make the session unusable and must abort the run
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::SessionTerminated(_) | DomainError::CorruptSession(_)
        )
    }
}
