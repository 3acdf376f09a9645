//! Socratic configuration from TOML (`[socratic]` section)

use philosopher_domain::QualityPolicy;
use serde::{Deserialize, Serialize};

/// Raw Socratic configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSocraticConfig {
    /// At most 10
    pub max_rounds: u32,
    pub satisfaction_threshold: f64,
    pub stagnation_delta: f64,
    /// Let refinement rounds search again
    pub allow_re_research: bool,
}

impl Default for FileSocraticConfig {
    fn default() -> Self {
        let policy = QualityPolicy::default();
        Self {
            max_rounds: policy.max_rounds,
            satisfaction_threshold: policy.satisfaction_threshold,
            stagnation_delta: policy.stagnation_delta,
            allow_re_research: false,
        }
    }
}

impl FileSocraticConfig {
    pub fn to_policy(&self) -> QualityPolicy {
        QualityPolicy {
            satisfaction_threshold: self.satisfaction_threshold,
            stagnation_delta: self.stagnation_delta,
            max_rounds: self.max_rounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;

    #[test]
    fn test_partial_section_keeps_defaults() {
        let toml_str = r#"
[socratic]
max_rounds = 4
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let policy = config.socratic.to_policy();
        assert_eq!(policy.max_rounds, 4);
        assert_eq!(policy.satisfaction_threshold, 0.8);
        assert_eq!(policy.stagnation_delta, 0.05);
        assert!(!config.socratic.allow_re_research);
    }
}
