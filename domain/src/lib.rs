//! Domain layer for philosopher
//!
//! This crate contains the session entities, value objects and pure rules.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Debate
//!
//! Three or more debaters with fixed viewpoints go through research,
//! preparation, three rotating debate rounds and a conclusion where
//! consensus is extracted from the history.
//!
//! ## Socratic dialogue
//!
//! A thinker refines an answer while a questioner scores it; the loop stops
//! when the answer is good enough, stops improving, or runs out of rounds.
//!
//! ## Context broker
//!
//! Every worker call is built from the session by a pure function that
//! enforces who may see what.

pub mod config;
pub mod context;
pub mod core;
pub mod debate;
pub mod providers;
pub mod session;
pub mod socratic;
pub mod topic_gate;
pub mod worker;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    participant::{ParticipantId, Role, Viewpoint},
    topic::Topic,
};
pub use debate::{
    ActionKind, AdmittedTurn, Coercion, ConsensusPoint, ConsensusReport, DEBATE_ROUNDS,
    DebateSession, Participant, PreparationRecord, ResearchRecord, StanceSummary, TurnSlot,
    UnresolvedPoint, UnresolvedReason, Utterance,
};
pub use providers::{Provider, ProviderCommand, ProviderConfig, UnknownProvider};
pub use session::{FailureKind, Phase, PhaseFailure, TerminationState};
pub use socratic::{
    Answer, BestAnswer, Decision, Dimension, Evaluation, QaEntry, QualityPolicy, SocraticSession,
    Verdict,
};
pub use topic_gate::{TopicAnalysis, TopicDimension, analyze_topic};
pub use worker::{
    DebateTurn, EvaluationReport, ParsedResponse, ResponseSchema, SchemaError, VisibleContext,
    WorkerRequest, WorkerResponse, parse_response,
};
