//! Private per-participant artifacts produced by the parallel phases.
//!
//! Both records are owned by exactly one participant and become read-only
//! once submitted. Only the preparation phase ever shows a research record
//! to another participant.

use serde::{Deserialize, Serialize};

/// Kind of supporting evidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvidenceKind {
    Research,
    Statistics,
    Expert,
    #[default]
    Logic,
}

/// One piece of evidence gathered during research
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(rename = "type", default)]
    pub kind: EvidenceKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Output of the research phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRecord {
    #[serde(default)]
    pub viewpoint: String,
    pub core_thesis: String,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
    #[serde(default)]
    pub potential_weaknesses: Vec<String>,
}

impl ResearchRecord {
    pub fn new(core_thesis: impl Into<String>) -> Self {
        Self {
            viewpoint: String::new(),
            core_thesis: core_thesis.into(),
            evidence: Vec::new(),
            potential_weaknesses: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }
}

/// A planned attack on another participant's position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAttack {
    pub target: String,
    pub point: String,
    #[serde(default)]
    pub strategy: String,
}

/// A planned show of support for another participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSupport {
    pub target: String,
    pub point: String,
    #[serde(default)]
    pub reason: String,
}

/// A prepared answer to an anticipated attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefensePrep {
    pub anticipated_attack: String,
    pub defense: String,
}

/// Output of the preparation phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreparationRecord {
    #[serde(default)]
    pub attacks: Vec<PlannedAttack>,
    #[serde(default)]
    pub supports: Vec<PlannedSupport>,
    #[serde(default)]
    pub defense_prep: Vec<DefensePrep>,
}

impl PreparationRecord {
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty() && self.supports.is_empty() && self.defense_prep.is_empty()
    }
}
