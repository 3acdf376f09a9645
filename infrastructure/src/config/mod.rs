//! Configuration file loading for philosopher
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PHILOSOPHER_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./philosopher.toml` or `./.philosopher.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/philosopher/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDebateConfig, FileLoggingConfig, FileOutputConfig,
    FileParticipantConfig, FileProviderCommand, FileProvidersConfig, FileSocraticConfig,
    FileTimeoutsConfig,
};
pub use loader::ConfigLoader;
