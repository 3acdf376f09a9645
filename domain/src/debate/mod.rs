//! Debate domain
//!
//! A debate runs three or more debaters, each holding a fixed viewpoint,
//! through a fixed phase sequence:
//!
//! ```text
//! research      ── parallel fan-out, topic + own viewpoint only
//!     │ join barrier
//! preparation   ── parallel fan-out, own research + peers' research
//!     │ join barrier
//! round 1..=3   ── sequential turns, speaker order rotated each round
//!     │
//! conclusion    ── consensus extraction over the final history
//! ```
//!
//! Everything in this module is pure: the session is mutated only by the
//! driving use case, and the scheduling and consensus rules are functions
//! of their inputs.

pub mod artifacts;
pub mod consensus;
pub mod schedule;
pub mod session;
pub mod utterance;

pub use artifacts::{
    DefensePrep, Evidence, EvidenceKind, PlannedAttack, PlannedSupport, PreparationRecord,
    ResearchRecord,
};
pub use consensus::{ConsensusPoint, ConsensusReport, UnresolvedPoint, UnresolvedReason};
pub use schedule::{AdmittedTurn, Coercion, DEBATE_ROUNDS, TurnSlot};
pub use session::{DebateSession, Participant};
pub use utterance::{ActionKind, StanceSummary, Utterance};
