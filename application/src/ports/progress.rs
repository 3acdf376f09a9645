//! Progress notification port
//!
//! Defines the interface for reporting progress while a session runs.

use philosopher_domain::{Coercion, ParticipantId, Phase, Verdict};

/// Callback for progress updates during a debate or Socratic run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console bars, plain log lines, nothing).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts; `round` is set for debate rounds and
    /// Socratic loop steps
    fn on_phase_start(&self, phase: &Phase, round: Option<u32>, total_tasks: usize);

    /// Called when one worker call of the phase has finished
    fn on_task_complete(&self, phase: &Phase, participant: &ParticipantId, success: bool);

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: &Phase);

    // ==================== Optional hooks ====================

    /// Called when the scheduler rewrote an out-of-contract action
    fn on_coercion(&self, _coercion: &Coercion) {}

    /// Called after each Socratic evaluation with the evaluator's verdict
    fn on_quality_decision(&self, _verdict: &Verdict) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: &Phase, _round: Option<u32>, _total_tasks: usize) {}
    fn on_task_complete(&self, _phase: &Phase, _participant: &ParticipantId, _success: bool) {}
    fn on_phase_complete(&self, _phase: &Phase) {}
}
