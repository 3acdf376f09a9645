//! Error types for the provider process adapter

use philosopher_application::GatewayError;
use philosopher_domain::Provider;
use thiserror::Error;

/// Errors that can occur while running a provider command
#[derive(Error, Debug)]
pub enum ProcessWorkerError {
    #[error("{provider} is disabled in the configuration")]
    Disabled { provider: Provider },

    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error talking to the worker: {0}")]
    Io(#[from] std::io::Error),

    #[error("{command} exited with {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("{command} wrote non-UTF-8 output")]
    InvalidOutput { command: String },
}

impl From<ProcessWorkerError> for GatewayError {
    fn from(e: ProcessWorkerError) -> Self {
        match e {
            ProcessWorkerError::Disabled { .. } => GatewayError::ProviderUnavailable(e.to_string()),
            ProcessWorkerError::Spawn { ref source, .. }
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                GatewayError::ProviderUnavailable(e.to_string())
            }
            ProcessWorkerError::Serialization(_) => GatewayError::Encoding(e.to_string()),
            ProcessWorkerError::Io(ref io) if io.kind() == std::io::ErrorKind::BrokenPipe => {
                GatewayError::TransportClosed
            }
            _ => GatewayError::RequestFailed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_binary_is_unavailable() {
        let e = ProcessWorkerError::Spawn {
            command: "gemini".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(matches!(
            GatewayError::from(e),
            GatewayError::ProviderUnavailable(_)
        ));
    }

    #[test]
    fn test_non_zero_exit_is_request_failure() {
        let e = ProcessWorkerError::NonZeroExit {
            command: "claude".into(),
            status: "exit status: 2".into(),
            stderr: "rate limited".into(),
        };
        let GatewayError::RequestFailed(message) = GatewayError::from(e) else {
            panic!("expected RequestFailed");
        };
        assert!(message.contains("rate limited"));
    }
}
