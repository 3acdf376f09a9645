//! Provider availability check against `PATH`.

use philosopher_application::ProviderProbe;
use philosopher_domain::{Provider, ProviderConfig};
use tracing::debug;

/// A provider is available when it is enabled and its command resolves
/// via `which`.
pub struct PathProviderProbe {
    config: ProviderConfig,
}

impl PathProviderProbe {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    /// Check if a CLI command is available
    pub fn is_command_available(command: &str) -> bool {
        which::which(command).is_ok()
    }
}

impl ProviderProbe for PathProviderProbe {
    fn is_available(&self, provider: Provider) -> bool {
        let Some(command) = self.config.command(provider) else {
            return false;
        };
        let available = command.enabled && Self::is_command_available(&command.command);
        debug!(
            "Provider {} ({}): {}",
            provider,
            command.command,
            if available { "available" } else { "unavailable" }
        );
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use philosopher_domain::ProviderCommand;

    fn config_with(provider: Provider, command: &str, enabled: bool) -> ProviderConfig {
        let mut config = ProviderConfig::default();
        config.commands.insert(
            provider,
            ProviderCommand {
                command: command.into(),
                args: vec![],
                enabled,
            },
        );
        config
    }

    #[cfg(unix)]
    #[test]
    fn test_command_on_path_is_available() {
        let probe = PathProviderProbe::new(config_with(Provider::Claude, "sh", true));
        assert!(probe.is_available(Provider::Claude));
    }

    #[test]
    fn test_missing_command_is_unavailable() {
        let probe = PathProviderProbe::new(config_with(
            Provider::Gemini,
            "philosopher-no-such-provider",
            true,
        ));
        assert!(!probe.is_available(Provider::Gemini));
    }

    #[cfg(unix)]
    #[test]
    fn test_disabled_provider_is_unavailable() {
        let probe = PathProviderProbe::new(config_with(Provider::Codex, "sh", false));
        assert!(!probe.is_available(Provider::Codex));
    }

    #[test]
    fn test_unconfigured_provider_is_unavailable() {
        let mut config = ProviderConfig::default();
        config.commands.clear();
        let probe = PathProviderProbe::new(config);
        assert!(!probe.is_available(Provider::Claude));
    }
}
