//! Output format value object

use serde::{Deserialize, Serialize};

/// How a finished session is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Full report as JSON
    Json,
    /// Plain-text digest (default)
    #[default]
    Summary,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "summary" => Ok(OutputFormat::Summary),
            other => Err(format!("unknown output format {:?} (expected json or summary)", other)),
        }
    }
}
