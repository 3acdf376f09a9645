//! Quality evaluator: decides whether the Socratic loop continues.
//!
//! Pure function of the evaluation, the scores seen so far and the round
//! number. The checks run in a fixed order:
//!
//! 1. satisfied (average at or above the threshold)
//! 2. stagnated (two consecutive improvements below the delta)
//! 3. round cap
//! 4. otherwise continue, aiming the next refinement at the weakest dimension

use super::evaluation::{Dimension, Evaluation};
use crate::session::TerminationState;
use serde::{Deserialize, Serialize};

/// Hard ceiling on Socratic rounds
pub const MAX_SOCRATIC_ROUNDS: u32 = 10;

/// Float slack so that an improvement of exactly the delta is not stagnation
const EPSILON: f64 = 1e-9;

/// Thresholds driving the loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityPolicy {
    pub satisfaction_threshold: f64,
    pub stagnation_delta: f64,
    pub max_rounds: u32,
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self {
            satisfaction_threshold: 0.8,
            stagnation_delta: 0.05,
            max_rounds: MAX_SOCRATIC_ROUNDS,
        }
    }
}

/// What the loop does next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Continue { target: Dimension },
    Stop { state: TerminationState },
}

impl Decision {
    pub fn is_stop(&self) -> bool {
        matches!(self, Decision::Stop { .. })
    }
}

/// A decision together with the average that produced it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub round: u32,
    pub average: f64,
    pub decision: Decision,
}

impl QualityPolicy {
    /// Decide the next step after the evaluation of `round`.
    ///
    /// `score_history` holds the averages of earlier rounds, oldest first,
    /// and does not yet include this evaluation.
    pub fn decide(&self, evaluation: &Evaluation, score_history: &[f64], round: u32) -> Verdict {
        let average = evaluation.average();

        let decision = if average >= self.satisfaction_threshold {
            Decision::Stop {
                state: TerminationState::Satisfied,
            }
        } else if self.is_stagnant(score_history, average) {
            Decision::Stop {
                state: TerminationState::Stagnated,
            }
        } else if round >= self.max_rounds.min(MAX_SOCRATIC_ROUNDS) {
            Decision::Stop {
                state: TerminationState::MaxRoundsReached,
            }
        } else {
            Decision::Continue {
                target: evaluation.weakest(),
            }
        };

        Verdict {
            round,
            average,
            decision,
        }
    }

    fn is_stagnant(&self, score_history: &[f64], average: f64) -> bool {
        let n = score_history.len();
        if n < 2 {
            return false;
        }
        let (a, b, c) = (score_history[n - 2], score_history[n - 1], average);
        b - a + EPSILON < self.stagnation_delta && c - b + EPSILON < self.stagnation_delta
    }
}

/// [`QualityPolicy::decide`] with the default thresholds
pub fn decide(evaluation: &Evaluation, score_history: &[f64], round: u32) -> Verdict {
    QualityPolicy::default().decide(evaluation, score_history, round)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(state: TerminationState) -> Decision {
        Decision::Stop { state }
    }

    #[test]
    fn test_satisfied_at_threshold() {
        let verdict = decide(&Evaluation::uniform(0.8).unwrap(), &[], 1);
        assert_eq!(verdict.decision, stop(TerminationState::Satisfied));
    }

    #[test]
    fn test_satisfied_beats_round_cap() {
        let verdict = decide(&Evaluation::uniform(0.9).unwrap(), &[0.1, 0.2], 10);
        assert_eq!(verdict.decision, stop(TerminationState::Satisfied));
    }

    #[test]
    fn test_stagnation_after_two_small_improvements() {
        let verdict = decide(&Evaluation::uniform(0.77).unwrap(), &[0.70, 0.73], 3);
        assert_eq!(verdict.decision, stop(TerminationState::Stagnated));
    }

    #[test]
    fn test_improvement_of_exactly_delta_is_progress() {
        let verdict = decide(&Evaluation::uniform(0.80 - 0.01).unwrap(), &[0.69, 0.74], 3);
        assert!(!verdict.decision.is_stop());

        let verdict = decide(&Evaluation::uniform(0.75).unwrap(), &[0.65, 0.70], 3);
        assert!(!verdict.decision.is_stop());
    }

    #[test]
    fn test_regression_counts_as_stagnation() {
        let verdict = decide(&Evaluation::uniform(0.55).unwrap(), &[0.6, 0.58], 3);
        assert_eq!(verdict.decision, stop(TerminationState::Stagnated));
    }

    #[test]
    fn test_stagnation_needs_three_scores() {
        let verdict = decide(&Evaluation::uniform(0.51).unwrap(), &[0.5], 2);
        assert!(!verdict.decision.is_stop());
    }

    #[test]
    fn test_stagnation_checked_before_round_cap() {
        let verdict = decide(&Evaluation::uniform(0.73).unwrap(), &[0.70, 0.72], 10);
        assert_eq!(verdict.decision, stop(TerminationState::Stagnated));
    }

    #[test]
    fn test_round_cap() {
        let verdict = decide(&Evaluation::uniform(0.5).unwrap(), &[0.1, 0.3], 10);
        assert_eq!(verdict.decision, stop(TerminationState::MaxRoundsReached));
    }

    #[test]
    fn test_continue_targets_weakest() {
        let e = Evaluation::new(0.6, 0.6, 0.4, 0.6, 0.6).unwrap();
        let verdict = decide(&e, &[], 1);
        assert_eq!(
            verdict.decision,
            Decision::Continue {
                target: Dimension::Completeness
            }
        );
        assert!((verdict.average - 0.56).abs() < 1e-9);
    }

    #[test]
    fn test_custom_max_rounds_cannot_exceed_ceiling() {
        let policy = QualityPolicy {
            max_rounds: 50,
            ..Default::default()
        };
        let verdict = policy.decide(&Evaluation::uniform(0.1).unwrap(), &[], 10);
        assert_eq!(verdict.decision, stop(TerminationState::MaxRoundsReached));
    }
}
