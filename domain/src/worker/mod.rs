//! Worker call contract: what a worker is sent and what it must answer.

pub mod parsing;
pub mod request;
pub mod response;

pub use parsing::{SchemaError, extract_json, parse_response};
pub use request::{Constraints, OwnArtifacts, PeerResearch, VisibleContext, WorkerRequest};
pub use response::{
    DebateTurn, EvaluationReport, ParsedResponse, ResponseSchema, TurnAction, WorkerResponse,
};
