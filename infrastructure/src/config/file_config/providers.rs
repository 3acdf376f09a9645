//! Provider configuration from TOML (`[providers]` section)
//!
//! ```toml
//! [providers]
//! default = "claude"
//!
//! [providers.codex]
//! command = "/opt/bin/codex"
//! args = ["exec", "--json"]
//!
//! [providers.gemini]
//! enabled = false
//! ```

use super::ConfigValidationError;
use philosopher_domain::{Provider, ProviderCommand, ProviderConfig};
use serde::{Deserialize, Serialize};

/// One `[providers.<name>]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderCommand {
    /// Executable; defaults to the provider's own name
    pub command: Option<String>,
    pub args: Vec<String>,
    pub enabled: bool,
}

impl Default for FileProviderCommand {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            enabled: true,
        }
    }
}

impl FileProviderCommand {
    fn to_command(&self, provider: Provider) -> Result<ProviderCommand, ConfigValidationError> {
        let command = match &self.command {
            Some(c) if c.trim().is_empty() => {
                return Err(ConfigValidationError::EmptyCommand { provider });
            }
            Some(c) => c.trim().to_string(),
            None => provider.default_command().to_string(),
        };
        Ok(ProviderCommand {
            command,
            args: self.args.clone(),
            enabled: self.enabled,
        })
    }
}

/// Raw provider configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// Provider for participants without a binding: "claude", "codex" (or "gpt"), "gemini"
    pub default: String,
    pub claude: FileProviderCommand,
    pub codex: FileProviderCommand,
    pub gemini: FileProviderCommand,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            default: Provider::default().as_str().to_string(),
            claude: FileProviderCommand::default(),
            codex: FileProviderCommand::default(),
            gemini: FileProviderCommand::default(),
        }
    }
}

impl FileProvidersConfig {
    fn table(&self, provider: Provider) -> &FileProviderCommand {
        match provider {
            Provider::Claude => &self.claude,
            Provider::Codex => &self.codex,
            Provider::Gemini => &self.gemini,
        }
    }

    /// Convert to the domain provider settings
    pub fn to_provider_config(&self) -> Result<ProviderConfig, ConfigValidationError> {
        let default = self.default.parse::<Provider>()?;
        let mut commands = std::collections::BTreeMap::new();
        for provider in Provider::FALLBACK_ORDER {
            commands.insert(provider, self.table(provider).to_command(provider)?);
        }
        Ok(ProviderConfig { default, commands })
    }
}
