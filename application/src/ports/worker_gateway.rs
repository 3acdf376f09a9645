//! Worker Gateway port
//!
//! Defines the interface for sending one request to one reasoning worker.

use async_trait::async_trait;
use philosopher_domain::WorkerRequest;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while reaching a worker
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Provider not available: {0}")]
    ProviderUnavailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Could not encode request: {0}")]
    Encoding(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway to the reasoning workers
///
/// One call per request; the raw text the worker produced is returned as-is
/// and validated by the caller. Implementations (adapters) live in the
/// infrastructure layer.
#[async_trait]
pub trait WorkerGateway: Send + Sync {
    async fn invoke(&self, request: &WorkerRequest) -> Result<String, GatewayError>;
}

#[async_trait]
impl<T: WorkerGateway + ?Sized> WorkerGateway for Arc<T> {
    async fn invoke(&self, request: &WorkerRequest) -> Result<String, GatewayError> {
        (**self).invoke(request).await
    }
}
