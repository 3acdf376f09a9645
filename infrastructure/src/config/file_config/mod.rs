//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain / application
//! types at the edge.

mod debate;
mod output;
mod providers;
mod socratic;
mod timeouts;

pub use debate::{FileDebateConfig, FileParticipantConfig};
pub use output::{FileLoggingConfig, FileOutputConfig};
pub use providers::{FileProviderCommand, FileProvidersConfig};
pub use socratic::FileSocraticConfig;
pub use timeouts::FileTimeoutsConfig;

use philosopher_domain::socratic::MAX_SOCRATIC_ROUNDS;
use philosopher_domain::{Provider, UnknownProvider};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ConfigValidationError {
    #[error("timeouts.{0} cannot be 0")]
    ZeroTimeout(&'static str),

    #[error("socratic.max_rounds must be between 1 and {max}, got {value}")]
    MaxRoundsOutOfRange { value: u32, max: u32 },

    #[error("socratic.{field} must be within [0.0, 1.0], got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },

    #[error("invalid participant id {0:?}")]
    InvalidParticipant(String),

    #[error("participant {0:?} has no viewpoint")]
    EmptyViewpoint(String),

    #[error("providers.{provider}.command cannot be empty")]
    EmptyCommand { provider: Provider },

    #[error(transparent)]
    UnknownProvider(#[from] UnknownProvider),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Debaters and the topic gate
    pub debate: FileDebateConfig,
    /// Quality loop thresholds
    pub socratic: FileSocraticConfig,
    /// Per-phase call budgets
    pub timeouts: FileTimeoutsConfig,
    /// Provider commands and the default binding
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript and log file locations
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning every detected issue.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        for (key, secs) in self.timeouts.entries() {
            if secs == 0 {
                issues.push(ConfigValidationError::ZeroTimeout(key));
            }
        }

        let rounds = self.socratic.max_rounds;
        if rounds == 0 || rounds > MAX_SOCRATIC_ROUNDS {
            issues.push(ConfigValidationError::MaxRoundsOutOfRange {
                value: rounds,
                max: MAX_SOCRATIC_ROUNDS,
            });
        }
        for (field, value) in [
            ("satisfaction_threshold", self.socratic.satisfaction_threshold),
            ("stagnation_delta", self.socratic.stagnation_delta),
        ] {
            if !(0.0..=1.0).contains(&value) {
                issues.push(ConfigValidationError::ThresholdOutOfRange { field, value });
            }
        }

        if let Err(e) = self.debate.to_participants() {
            issues.push(e);
        }
        if let Err(e) = self.providers.to_provider_config() {
            issues.push(e);
        }

        issues
    }
}
