//! Answer evaluation scores (Value Object)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One scored quality dimension of an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Depth,
    Coherence,
    Completeness,
    Practicality,
    Humility,
}

impl Dimension {
    /// Tie-break order when several dimensions share the lowest score
    pub const PRIORITY: [Dimension; 5] = [
        Dimension::Completeness,
        Dimension::Depth,
        Dimension::Coherence,
        Dimension::Practicality,
        Dimension::Humility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Depth => "depth",
            Dimension::Coherence => "coherence",
            Dimension::Completeness => "completeness",
            Dimension::Practicality => "practicality",
            Dimension::Humility => "humility",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("score {dimension} = {value} is outside [0.0, 1.0]")]
pub struct ScoreOutOfRange {
    pub dimension: Dimension,
    pub value: f64,
}

/// Five quality scores in `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub depth: f64,
    pub coherence: f64,
    pub completeness: f64,
    pub practicality: f64,
    pub humility: f64,
}

impl Evaluation {
    pub fn new(
        depth: f64,
        coherence: f64,
        completeness: f64,
        practicality: f64,
        humility: f64,
    ) -> Result<Self, ScoreOutOfRange> {
        let evaluation = Self {
            depth,
            coherence,
            completeness,
            practicality,
            humility,
        };
        evaluation.validate()?;
        Ok(evaluation)
    }

    /// A uniform score, mostly useful for tests
    pub fn uniform(score: f64) -> Result<Self, ScoreOutOfRange> {
        Self::new(score, score, score, score, score)
    }

    /// Reject NaN and anything outside `[0.0, 1.0]`
    pub fn validate(&self) -> Result<(), ScoreOutOfRange> {
        for dimension in Dimension::PRIORITY {
            let value = self.score(dimension);
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoreOutOfRange { dimension, value });
            }
        }
        Ok(())
    }

    pub fn score(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Depth => self.depth,
            Dimension::Coherence => self.coherence,
            Dimension::Completeness => self.completeness,
            Dimension::Practicality => self.practicality,
            Dimension::Humility => self.humility,
        }
    }

    /// Arithmetic mean of the five scores
    pub fn average(&self) -> f64 {
        (self.depth + self.coherence + self.completeness + self.practicality + self.humility) / 5.0
    }

    /// Lowest-scoring dimension; ties go to the earlier entry of
    /// [`Dimension::PRIORITY`].
    pub fn weakest(&self) -> Dimension {
        let mut weakest = Dimension::PRIORITY[0];
        for dimension in Dimension::PRIORITY.into_iter().skip(1) {
            if self.score(dimension) < self.score(weakest) {
                weakest = dimension;
            }
        }
        weakest
    }
}
