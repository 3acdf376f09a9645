//! Presentation layer for philosopher
//!
//! This crate contains CLI definitions, report formatters,
//! progress reporters and the interactive decision prompt.

pub mod cli;
pub mod config;
pub mod decision;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, DebateArgs, OutputFormat, SocraticArgs};
pub use config::OutputConfig;
pub use decision::InteractiveDecision;
pub use output::console::ConsoleFormatter;
pub use output::formatter::Report;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
