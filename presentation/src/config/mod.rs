//! Presentation-level configuration
//!
//! Settles how a run is shown once the command line and the config file
//! have both had their say.

use crate::cli::commands::Cli;
use philosopher_domain::OutputFormat;
use std::io::IsTerminal;

/// Output configuration for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show progress indicators
    pub show_progress: bool,
    /// Use bars rather than plain lines for progress
    pub fancy_progress: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Summary,
            color: true,
            show_progress: true,
            fancy_progress: true,
        }
    }
}

impl OutputConfig {
    /// Command-line flags win over the `[output]` table
    pub fn resolve(cli: &Cli, file_format: Option<OutputFormat>, file_color: bool) -> Self {
        Self::resolve_for(cli, file_format, file_color, std::io::stderr().is_terminal())
    }

    /// Turn colors off process-wide when disabled
    pub fn apply_color(&self) {
        if !self.color {
            colored::control::set_override(false);
        }
    }

    fn resolve_for(
        cli: &Cli,
        file_format: Option<OutputFormat>,
        file_color: bool,
        stderr_is_terminal: bool,
    ) -> Self {
        Self {
            format: cli.output.map(Into::into).or(file_format).unwrap_or_default(),
            color: file_color && !cli.no_color,
            show_progress: !cli.quiet,
            fancy_progress: stderr_is_terminal,
        }
    }
}
