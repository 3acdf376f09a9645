//! Debate configuration from TOML (`[debate]` section)
//!
//! ```toml
//! [debate]
//! topic_gate = true
//!
//! [[debate.participants]]
//! id = "A"
//! viewpoint = "Start with a monolith"
//! provider = "claude"
//! ```

use super::ConfigValidationError;
use philosopher_domain::{Participant, ParticipantId, Provider};
use serde::{Deserialize, Serialize};

/// One `[[debate.participants]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileParticipantConfig {
    pub id: String,
    pub viewpoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl FileParticipantConfig {
    pub fn to_participant(&self) -> Result<Participant, ConfigValidationError> {
        let id = ParticipantId::try_new(&self.id)
            .ok_or_else(|| ConfigValidationError::InvalidParticipant(self.id.clone()))?;
        if self.viewpoint.trim().is_empty() {
            return Err(ConfigValidationError::EmptyViewpoint(self.id.clone()));
        }
        let participant = Participant::new(id, self.viewpoint.trim());
        match &self.provider {
            Some(name) => Ok(participant.with_provider(name.parse::<Provider>()?)),
            None => Ok(participant),
        }
    }
}

/// Raw debate configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDebateConfig {
    /// Canonical speaking order
    pub participants: Vec<FileParticipantConfig>,
    /// Refuse topics that fail the quality gate
    pub topic_gate: bool,
}

impl Default for FileDebateConfig {
    fn default() -> Self {
        Self {
            participants: Vec::new(),
            topic_gate: true,
        }
    }
}

impl FileDebateConfig {
    pub fn to_participants(&self) -> Result<Vec<Participant>, ConfigValidationError> {
        self.participants
            .iter()
            .map(FileParticipantConfig::to_participant)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::FileConfig;
    use super::*;

    #[test]
    fn test_participants_keep_file_order() {
        let toml_str = r#"
[debate]
topic_gate = false

[[debate.participants]]
id = "B"
viewpoint = "Microservices"
provider = "gemini"

[[debate.participants]]
id = "A"
viewpoint = "Monolith"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.debate.topic_gate);
        let participants = config.debate.to_participants().unwrap();
        let ids: Vec<_> = participants.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
        assert_eq!(participants[0].provider, Some(Provider::Gemini));
        assert_eq!(participants[1].provider, None);
    }

    #[test]
    fn test_blank_viewpoint_rejected() {
        let entry = FileParticipantConfig {
            id: "A".into(),
            viewpoint: " ".into(),
            provider: None,
        };
        assert!(matches!(
            entry.to_participant(),
            Err(ConfigValidationError::EmptyViewpoint(_))
        ));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let entry = FileParticipantConfig {
            id: "A".into(),
            viewpoint: "v".into(),
            provider: Some("llama".into()),
        };
        assert!(matches!(
            entry.to_participant(),
            Err(ConfigValidationError::UnknownProvider(_))
        ));
    }
}
