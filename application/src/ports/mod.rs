//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod decision;
pub mod progress;
pub mod provider_probe;
pub mod worker_gateway;
