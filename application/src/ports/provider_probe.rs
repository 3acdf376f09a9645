//! Provider availability port

use philosopher_domain::Provider;

/// Reports whether a provider can be reached before a session starts
pub trait ProviderProbe: Send + Sync {
    fn is_available(&self, provider: Provider) -> bool;
}

/// Probe with a fixed answer set, for tests and dry runs
pub struct StaticProbe {
    available: Vec<Provider>,
}

impl StaticProbe {
    pub fn new(available: impl IntoIterator<Item = Provider>) -> Self {
        Self {
            available: available.into_iter().collect(),
        }
    }
}

impl ProviderProbe for StaticProbe {
    fn is_available(&self, provider: Provider) -> bool {
        self.available.contains(&provider)
    }
}
