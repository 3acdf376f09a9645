//! Application layer for philosopher
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, PhaseBudgets};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    decision::{
        DecisionError, DecisionIssue, DecisionOption, DecisionOutcome, DecisionPort,
        DecisionRecord, DeferDecision,
    },
    progress::{NoProgress, ProgressNotifier},
    provider_probe::{ProviderProbe, StaticProbe},
    worker_gateway::{GatewayError, WorkerGateway},
};
pub use use_cases::resolve_providers::{
    ProviderResolution, ProviderResolutionError, ProviderSubstitution, resolve_providers,
};
pub use use_cases::run_debate::{DebateReport, RunDebateError, RunDebateInput, RunDebateUseCase};
pub use use_cases::run_socratic::{
    RunSocraticError, RunSocraticInput, RunSocraticUseCase, SocraticReport,
};
