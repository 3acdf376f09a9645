//! Call budgets from TOML (`[timeouts]` section)

use philosopher_application::{ExecutionParams, PhaseBudgets};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw per-phase budgets, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTimeoutsConfig {
    pub research_secs: u64,
    pub preparation_secs: u64,
    pub debate_turn_secs: u64,
    pub socratic_call_secs: u64,
    /// Clarifying re-requests after an invalid response
    pub max_schema_retries: u32,
}

impl Default for FileTimeoutsConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            research_secs: params.budgets.research.as_secs(),
            preparation_secs: params.budgets.preparation.as_secs(),
            debate_turn_secs: params.budgets.debate_turn.as_secs(),
            socratic_call_secs: params.budgets.socratic_call.as_secs(),
            max_schema_retries: params.max_schema_retries,
        }
    }
}

impl FileTimeoutsConfig {
    /// `(key, seconds)` for each budget
    pub(super) fn entries(&self) -> [(&'static str, u64); 4] {
        [
            ("research_secs", self.research_secs),
            ("preparation_secs", self.preparation_secs),
            ("debate_turn_secs", self.debate_turn_secs),
            ("socratic_call_secs", self.socratic_call_secs),
        ]
    }

    pub fn to_execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_budgets(PhaseBudgets {
                research: Duration::from_secs(self.research_secs),
                preparation: Duration::from_secs(self.preparation_secs),
                debate_turn: Duration::from_secs(self.debate_turn_secs),
                socratic_call: Duration::from_secs(self.socratic_call_secs),
            })
            .with_max_schema_retries(self.max_schema_retries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_execution_params() {
        let params = FileTimeoutsConfig::default().to_execution_params();
        assert_eq!(params.budgets, PhaseBudgets::default());
        assert_eq!(params.max_schema_retries, 1);
    }

    #[test]
    fn test_override_one_budget() {
        let config = FileTimeoutsConfig {
            debate_turn_secs: 45,
            ..Default::default()
        };
        let params = config.to_execution_params();
        assert_eq!(params.budgets.debate_turn, Duration::from_secs(45));
        assert_eq!(params.budgets.research, Duration::from_secs(600));
    }
}
