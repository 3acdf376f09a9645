//! Output formatter trait

use crate::output::console::ConsoleFormatter;
use philosopher_application::{DebateReport, SocraticReport};
use philosopher_domain::{OutputFormat, TopicAnalysis};
use serde::Serialize;

/// A finished result that can be printed in either output format
pub trait Report: Serialize {
    /// Plain-text digest
    fn summary(&self) -> String;

    fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Summary => self.summary(),
            OutputFormat::Json => ConsoleFormatter::format_json(self),
        }
    }
}

impl Report for DebateReport {
    fn summary(&self) -> String {
        ConsoleFormatter::format_debate(self)
    }
}

impl Report for SocraticReport {
    fn summary(&self) -> String {
        ConsoleFormatter::format_socratic(self)
    }
}

impl Report for TopicAnalysis {
    fn summary(&self) -> String {
        ConsoleFormatter::format_topic_analysis(self)
    }
}
