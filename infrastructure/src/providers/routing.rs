use super::command::CommandWorkerGateway;
use async_trait::async_trait;
use philosopher_application::{GatewayError, WorkerGateway};
use philosopher_domain::{Participant, ParticipantId, Provider, ProviderConfig, WorkerRequest};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Dispatches each request to the provider its participant is bound to.
///
/// Participants without a binding (the Socratic thinker and questioner, or
/// debaters left unbound) go to the default provider.
pub struct RoutingWorkerGateway {
    adapters: BTreeMap<Provider, Arc<dyn WorkerGateway>>,
    bindings: HashMap<ParticipantId, Provider>,
    default: Provider,
}

impl RoutingWorkerGateway {
    pub fn new(adapters: BTreeMap<Provider, Arc<dyn WorkerGateway>>, default: Provider) -> Self {
        Self {
            adapters,
            bindings: HashMap::new(),
            default,
        }
    }

    /// One [`CommandWorkerGateway`] per configured provider
    pub fn from_config(config: &ProviderConfig) -> Self {
        let adapters = config
            .commands
            .iter()
            .map(|(provider, command)| {
                let adapter: Arc<dyn WorkerGateway> =
                    Arc::new(CommandWorkerGateway::new(*provider, command.clone()));
                (*provider, adapter)
            })
            .collect();
        Self::new(adapters, config.default)
    }

    /// Bind participants to the providers resolved for them
    pub fn with_participants(mut self, participants: &[Participant]) -> Self {
        for p in participants {
            if let Some(provider) = p.provider {
                self.bindings.insert(p.id.clone(), provider);
            }
        }
        self
    }

    /// Use `provider` for participants without a binding
    pub fn with_default(mut self, provider: Provider) -> Self {
        self.default = provider;
        self
    }

    fn resolve(&self, participant: &ParticipantId) -> Result<&dyn WorkerGateway, GatewayError> {
        let provider = self
            .bindings
            .get(participant)
            .copied()
            .unwrap_or(self.default);
        self.adapters
            .get(&provider)
            .map(|a| a.as_ref())
            .ok_or_else(|| {
                GatewayError::ProviderUnavailable(format!(
                    "no adapter for {} (participant {})",
                    provider, participant
                ))
            })
    }
}

#[async_trait]
impl WorkerGateway for RoutingWorkerGateway {
    async fn invoke(&self, request: &WorkerRequest) -> Result<String, GatewayError> {
        self.resolve(&request.participant)?.invoke(request).await
    }
}
