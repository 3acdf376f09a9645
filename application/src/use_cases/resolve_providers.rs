//! Resolve Providers use case
//!
//! Binds every participant to a reachable provider before a session starts.

use crate::ports::provider_probe::ProviderProbe;
use philosopher_domain::{Participant, ParticipantId, Provider};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderResolutionError {
    #[error("No provider is available (tried {})", provider_list(.tried))]
    ProviderUnavailable { tried: Vec<Provider> },
}

fn provider_list(providers: &[Provider]) -> String {
    providers
        .iter()
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A binding that had to be replaced, reported with the session result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSubstitution {
    pub participant: ParticipantId,
    pub requested: Provider,
    pub substituted: Provider,
}

/// Participants with a reachable provider each
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResolution {
    pub participants: Vec<Participant>,
    pub substitutions: Vec<ProviderSubstitution>,
}

/// Bind each participant to a provider.
///
/// Unbound participants take `default`. An unavailable binding is replaced
/// by the first available provider in [`Provider::FALLBACK_ORDER`]; if no
/// provider at all is available the run cannot start.
pub fn resolve_providers(
    participants: Vec<Participant>,
    default: Provider,
    probe: &dyn ProviderProbe,
) -> Result<ProviderResolution, ProviderResolutionError> {
    let fallback = Provider::FALLBACK_ORDER
        .into_iter()
        .find(|p| probe.is_available(*p))
        .ok_or(ProviderResolutionError::ProviderUnavailable {
            tried: Provider::FALLBACK_ORDER.to_vec(),
        })?;

    let mut substitutions = Vec::new();
    let participants = participants
        .into_iter()
        .map(|participant| {
            let requested = participant.provider.unwrap_or(default);
            if probe.is_available(requested) {
                return participant.with_provider(requested);
            }
            warn!(
                "Provider {} for {} is unavailable, using {}",
                requested, participant.id, fallback
            );
            substitutions.push(ProviderSubstitution {
                participant: participant.id.clone(),
                requested,
                substituted: fallback,
            });
            participant.with_provider(fallback)
        })
        .collect();

    info!("Providers resolved ({} substitution(s))", substitutions.len());
    Ok(ProviderResolution {
        participants,
        substitutions,
    })
}
