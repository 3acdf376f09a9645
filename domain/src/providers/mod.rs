//! Reasoning providers for the multi-provider variant.
//!
//! Each debater can be bound to a different provider. Bindings are resolved
//! once before a session starts: an unavailable provider is replaced by the
//! first available one in [`Provider::FALLBACK_ORDER`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// A named reasoning provider (Value Object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Provider {
    #[default]
    Claude,
    Codex,
    Gemini,
}

impl Provider {
    /// Fixed substitution order used when a bound provider is unavailable
    pub const FALLBACK_ORDER: [Provider; 3] = [Provider::Claude, Provider::Codex, Provider::Gemini];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Claude => "claude",
            Provider::Codex => "codex",
            Provider::Gemini => "gemini",
        }
    }

    /// Executable conventionally used to reach this provider
    pub fn default_command(&self) -> &'static str {
        match self {
            Provider::Claude => "claude",
            Provider::Codex => "codex",
            Provider::Gemini => "gemini",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for unknown provider names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider {0:?} (expected claude, codex, gpt or gemini)")]
pub struct UnknownProvider(pub String);

impl std::str::FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(Provider::Claude),
            "codex" | "gpt" => Ok(Provider::Codex),
            "gemini" => Ok(Provider::Gemini),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

impl Serialize for Provider {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Provider {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// How to reach one provider (provider-neutral, serde-free)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCommand {
    /// Executable name or path
    pub command: String,
    /// Extra arguments passed before the request is written to stdin
    pub args: Vec<String>,
    /// Disabled providers are treated as unavailable
    pub enabled: bool,
}

impl ProviderCommand {
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            command: provider.default_command().to_string(),
            args: Vec::new(),
            enabled: true,
        }
    }
}

/// Provider settings for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider used by participants without an explicit binding
    pub default: Provider,
    /// Per-provider command settings
    pub commands: BTreeMap<Provider, ProviderCommand>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        let commands = Provider::FALLBACK_ORDER
            .iter()
            .map(|p| (*p, ProviderCommand::for_provider(*p)))
            .collect();
        Self {
            default: Provider::default(),
            commands,
        }
    }
}

impl ProviderConfig {
    pub fn command(&self, provider: Provider) -> Option<&ProviderCommand> {
        self.commands.get(&provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parse_aliases() {
        assert_eq!("gpt".parse::<Provider>().unwrap(), Provider::Codex);
        assert_eq!("Codex".parse::<Provider>().unwrap(), Provider::Codex);
        assert_eq!("claude".parse::<Provider>().unwrap(), Provider::Claude);
        assert!("llama".parse::<Provider>().is_err());
    }

    #[test]
    fn test_fallback_order() {
        assert_eq!(
            Provider::FALLBACK_ORDER,
            [Provider::Claude, Provider::Codex, Provider::Gemini]
        );
    }

    #[test]
    fn test_default_config_has_every_provider() {
        let config = ProviderConfig::default();
        for provider in Provider::FALLBACK_ORDER {
            assert_eq!(
                config.command(provider).unwrap().command,
                provider.default_command()
            );
        }
    }
}
