//! Worker gateway backed by a provider command-line tool.
//!
//! Each call spawns the configured command, writes the JSON request to its
//! stdin while draining stdout and stderr, closes stdin and returns whatever
//! the process printed on stdout.

use super::error::ProcessWorkerError;
use async_trait::async_trait;
use philosopher_application::{GatewayError, WorkerGateway};
use philosopher_domain::core::string::truncate;
use philosopher_domain::{Provider, ProviderCommand, WorkerRequest};
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Longest stderr excerpt carried in an error
const STDERR_EXCERPT: usize = 500;

/// Runs one provider command per request
pub struct CommandWorkerGateway {
    provider: Provider,
    command: ProviderCommand,
}

impl CommandWorkerGateway {
    pub fn new(provider: Provider, command: ProviderCommand) -> Self {
        Self { provider, command }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    async fn run(&self, request: &WorkerRequest) -> Result<String, ProcessWorkerError> {
        if !self.command.enabled {
            return Err(ProcessWorkerError::Disabled {
                provider: self.provider,
            });
        }
        let payload = request.to_json()?;

        debug!(
            "Spawning {} {:?} for {} ({})",
            self.command.command, self.command.args, request.participant, request.phase
        );
        let mut child = Command::new(&self.command.command)
            .args(&self.command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // A call abandoned by its deadline must not leave the process behind
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessWorkerError::Spawn {
                command: self.command.command.clone(),
                source,
            })?;

        // The child may fill its stdout pipe before reading all of stdin
        let stdin = child.stdin.take();
        let write = async move {
            match stdin {
                Some(mut stdin) => {
                    stdin.write_all(payload.as_bytes()).await?;
                    stdin.shutdown().await
                }
                None => Ok(()),
            }
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;
        if !output.status.success() {
            return Err(ProcessWorkerError::NonZeroExit {
                command: self.command.command.clone(),
                status: output.status.to_string(),
                stderr: truncate(String::from_utf8_lossy(&output.stderr).trim(), STDERR_EXCERPT),
            });
        }
        match written {
            // Exited successfully without reading the whole request
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                debug!("{} closed stdin early", self.command.command);
            }
            other => other?,
        }

        String::from_utf8(output.stdout).map_err(|_| ProcessWorkerError::InvalidOutput {
            command: self.command.command.clone(),
        })
    }
}

#[async_trait]
impl WorkerGateway for CommandWorkerGateway {
    async fn invoke(&self, request: &WorkerRequest) -> Result<String, GatewayError> {
        self.run(request).await.map_err(GatewayError::from)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use philosopher_domain::context::broker;
    use philosopher_domain::{DebateSession, Participant, ParticipantId, Topic};

    fn request() -> WorkerRequest {
        let session = DebateSession::new(
            Topic::new("Monolith vs microservices").unwrap(),
            vec![
                Participant::new("A".parse().unwrap(), "Monolith"),
                Participant::new("B".parse().unwrap(), "Microservices"),
            ],
        )
        .unwrap();
        let id: ParticipantId = "A".parse().unwrap();
        broker::research_request(&session, &id).unwrap()
    }

    fn shell(script: &str) -> ProviderCommand {
        ProviderCommand {
            command: "sh".into(),
            args: vec!["-c".into(), script.into()],
            enabled: true,
        }
    }

    #[tokio::test]
    async fn test_request_is_written_to_stdin() {
        let gateway = CommandWorkerGateway::new(Provider::Claude, shell("cat"));
        let out = gateway.invoke(&request()).await.unwrap();
        let echoed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(echoed["participant"], "A");
        assert_eq!(echoed["phase"], "research");
    }

    #[tokio::test]
    async fn test_large_request_with_early_output_completes() {
        // Both pipes overflow unless stdin and stdout are serviced together
        let gateway = CommandWorkerGateway::new(
            Provider::Claude,
            shell("head -c 262144 /dev/zero; cat >/dev/null"),
        );
        let big = request().with_clarification("x".repeat(1 << 20));
        let out = tokio::time::timeout(std::time::Duration::from_secs(30), gateway.invoke(&big))
            .await
            .expect("command gateway stalled")
            .unwrap();
        assert_eq!(out.len(), 262144);
    }

    #[tokio::test]
    async fn test_non_zero_exit_fails() {
        let gateway =
            CommandWorkerGateway::new(Provider::Codex, shell("cat >/dev/null; echo quota >&2; exit 3"));
        let err = gateway.invoke(&request()).await.unwrap_err();
        assert!(
            matches!(&err, GatewayError::RequestFailed(m) if m.contains("quota")),
            "unexpected error: {:?}",
            err
        );
    }

    #[tokio::test]
    async fn test_missing_command_is_unavailable() {
        let command = ProviderCommand {
            command: "philosopher-no-such-provider".into(),
            args: vec![],
            enabled: true,
        };
        let gateway = CommandWorkerGateway::new(Provider::Gemini, command);
        assert!(matches!(
            gateway.invoke(&request()).await,
            Err(GatewayError::ProviderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_provider_is_unavailable() {
        let mut command = shell("cat");
        command.enabled = false;
        let gateway = CommandWorkerGateway::new(Provider::Claude, command);
        assert!(matches!(
            gateway.invoke(&request()).await,
            Err(GatewayError::ProviderUnavailable(_))
        ));
    }
}
