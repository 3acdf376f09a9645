//! Execution parameters: use case call control.
//!
//! [`ExecutionParams`] groups the static parameters that bound every worker
//! call made by [`RunDebateUseCase`](crate::use_cases::run_debate::RunDebateUseCase)
//! and [`RunSocraticUseCase`](crate::use_cases::run_socratic::RunSocraticUseCase).
//! These are application-layer concerns, not domain policy.

use philosopher_domain::Phase;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call time budget of each phase.
///
/// | Phase | Default |
/// |-------|---------|
/// | research | 600 s |
/// | preparation | 600 s |
/// | debate turn | 300 s |
/// | Socratic call | 300 s |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBudgets {
    pub research: Duration,
    pub preparation: Duration,
    pub debate_turn: Duration,
    pub socratic_call: Duration,
}

impl Default for PhaseBudgets {
    fn default() -> Self {
        Self {
            research: Duration::from_secs(600),
            preparation: Duration::from_secs(600),
            debate_turn: Duration::from_secs(300),
            socratic_call: Duration::from_secs(300),
        }
    }
}

impl PhaseBudgets {
    pub fn for_phase(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Research => self.research,
            Phase::Preparation => self.preparation,
            Phase::Debate | Phase::Conclusion => self.debate_turn,
            Phase::InitialAnalysis | Phase::Evaluate | Phase::Refine => self.socratic_call,
        }
    }
}

/// Call control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    pub budgets: PhaseBudgets,
    /// Clarifying re-requests after a schema validation failure.
    pub max_schema_retries: u32,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            budgets: PhaseBudgets::default(),
            max_schema_retries: 1,
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_budgets(mut self, budgets: PhaseBudgets) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn with_max_schema_retries(mut self, retries: u32) -> Self {
        self.max_schema_retries = retries;
        self
    }

    /// Deadline of a parallel phase's join barrier: every attempt of a
    /// call must fit in it.
    pub fn barrier_deadline(&self, phase: Phase) -> Duration {
        self.budgets.for_phase(phase) * (self.max_schema_retries + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_schema_retries, 1);
        assert_eq!(params.budgets.for_phase(Phase::Research), Duration::from_secs(600));
        assert_eq!(params.budgets.for_phase(Phase::Debate), Duration::from_secs(300));
        assert_eq!(params.budgets.for_phase(Phase::Refine), Duration::from_secs(300));
    }

    #[test]
    fn test_barrier_deadline_covers_retry() {
        let params = ExecutionParams::default();
        assert_eq!(
            params.barrier_deadline(Phase::Preparation),
            Duration::from_secs(1200)
        );
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_schema_retries(0)
            .with_budgets(PhaseBudgets {
                research: Duration::from_secs(5),
                ..Default::default()
            });
        assert_eq!(params.barrier_deadline(Phase::Research), Duration::from_secs(5));
    }
}
