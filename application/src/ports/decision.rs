//! External decision port for unresolved debate points.
//!
//! # Architecture
//!
//! Following the Ports and Adapters pattern:
//! - **Port**: [`DecisionPort`] - defined here in application layer
//! - **Adapter**: `InteractiveDecision` - implemented in presentation layer
//!
//! # Flow
//!
//! ```text
//! round 3 committed
//!        ↓
//! consensus extraction
//!        ↓ unresolved points
//! DecisionPort::decide()   (called once per session)
//!        ↓
//! Selected(participant) / NeedsMoreDiscussion, appended to the report
//! ```
//!
//! The outcome never reopens the debate.
//!
//! # Built-in Implementations
//!
//! - [`DeferDecision`] - Always returns `NeedsMoreDiscussion`

use async_trait::async_trait;
use philosopher_domain::{ParticipantId, UnresolvedReason};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of the decision process itself, not a decision.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("Decision cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(String),
}

/// One participant's position on an unresolved point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    pub participant: ParticipantId,
    /// Final stance summary, or the participant's latest key point
    pub position: String,
}

/// An unresolved point put to the decision maker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionIssue {
    pub point: String,
    pub reasons: Vec<UnresolvedReason>,
    pub options: Vec<DecisionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DecisionOutcome {
    Selected { participant: ParticipantId },
    NeedsMoreDiscussion,
}

/// A decided issue as it appears in the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub point: String,
    #[serde(flatten)]
    pub outcome: DecisionOutcome,
}

/// Port for resolving what the debate could not.
#[async_trait]
pub trait DecisionPort: Send + Sync {
    /// Return one outcome per issue, in the same order.
    async fn decide(&self, issues: &[DecisionIssue]) -> Result<Vec<DecisionOutcome>, DecisionError>;
}

/// Leaves every issue open.
///
/// Used for non-interactive runs.
pub struct DeferDecision;

#[async_trait]
impl DecisionPort for DeferDecision {
    async fn decide(&self, issues: &[DecisionIssue]) -> Result<Vec<DecisionOutcome>, DecisionError> {
        Ok(vec![DecisionOutcome::NeedsMoreDiscussion; issues.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_defer_decision() {
        let issues = vec![
            DecisionIssue {
                point: "p".into(),
                reasons: vec![UnresolvedReason::UnansweredAttack],
                options: vec![],
            };
            2
        ];
        let outcomes = DeferDecision.decide(&issues).await.unwrap();
        assert_eq!(outcomes, vec![DecisionOutcome::NeedsMoreDiscussion; 2]);
    }

    #[test]
    fn test_record_serialization() {
        let record = DecisionRecord {
            point: "cost".into(),
            outcome: DecisionOutcome::Selected {
                participant: "B".parse().unwrap(),
            },
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["outcome"], "selected");
        assert_eq!(json["participant"], "B");
    }
}
