//! Progress reporting for debate and Socratic runs
//!
//! Everything here draws on stderr so a JSON report on stdout stays clean.

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use philosopher_application::ProgressNotifier;
use philosopher_domain::{Coercion, Decision, ParticipantId, Phase, Verdict};
use std::sync::Mutex;

/// Reports progress with one bar per phase
pub struct ProgressReporter {
    multi: MultiProgress,
    phase_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            phase_bar: Mutex::new(None),
        }
    }

    fn phase_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn println(&self, line: String) {
        // Printing through MultiProgress keeps the line above the live bars
        if self.multi.println(&line).is_err() {
            eprintln!("{}", line);
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// "Debate Round 2", "Evaluation (round 3)", "Research"
pub fn phase_label(phase: &Phase, round: Option<u32>) -> String {
    match (phase, round) {
        (Phase::Debate, Some(r)) => format!("{} {}", phase.display_name(), r),
        (Phase::Evaluate | Phase::Refine, Some(r)) => {
            format!("{} (round {})", phase.display_name(), r)
        }
        _ => phase.display_name().to_string(),
    }
}

fn verdict_line(verdict: &Verdict) -> String {
    let outcome = match verdict.decision {
        Decision::Continue { target } => format!("continue, refine {}", target),
        Decision::Stop { state } => format!("stop ({})", state.as_str()),
    };
    format!("round {}: average {:.2}, {}", verdict.round, verdict.average, outcome)
}

fn coercion_line(coercion: &Coercion) -> String {
    format!(
        "round {} turn {}: {} {} -> {} ({})",
        coercion.round, coercion.turn, coercion.speaker, coercion.from, coercion.to, coercion.reason
    )
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, phase: &Phase, round: Option<u32>, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::phase_style());
        pb.set_prefix(phase_label(phase, round));
        pb.set_message("Starting...");

        if let Ok(mut slot) = self.phase_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_task_complete(&self, _phase: &Phase, participant: &ParticipantId, success: bool) {
        let Ok(slot) = self.phase_bar.lock() else {
            return;
        };
        if let Some(pb) = slot.as_ref() {
            let status = if success {
                format!("{} {}", "v".green(), participant)
            } else {
                format!("{} {}", "x".red(), participant)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_phase_complete(&self, phase: &Phase) {
        let Ok(mut slot) = self.phase_bar.lock() else {
            return;
        };
        if let Some(pb) = slot.take() {
            pb.finish_with_message(format!("{} complete!", phase.display_name().green()));
        }
    }

    fn on_coercion(&self, coercion: &Coercion) {
        self.println(format!("  {} {}", "!".yellow(), coercion_line(coercion)));
    }

    fn on_quality_decision(&self, verdict: &Verdict) {
        self.println(format!("  {} {}", "*".cyan(), verdict_line(verdict)));
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, phase: &Phase, round: Option<u32>, total_tasks: usize) {
        eprintln!(
            "{} {} ({} tasks)",
            "->".cyan(),
            phase_label(phase, round).bold(),
            total_tasks
        );
    }

    fn on_task_complete(&self, _phase: &Phase, participant: &ParticipantId, success: bool) {
        if success {
            eprintln!("  {} {}", "v".green(), participant);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), participant);
        }
    }

    fn on_phase_complete(&self, _phase: &Phase) {
        eprintln!();
    }

    fn on_coercion(&self, coercion: &Coercion) {
        eprintln!("  {} {}", "!".yellow(), coercion_line(coercion));
    }

    fn on_quality_decision(&self, verdict: &Verdict) {
        eprintln!("  {} {}", "*".cyan(), verdict_line(verdict));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use philosopher_domain::{ActionKind, Dimension, TerminationState};

    #[test]
    fn test_phase_label() {
        assert_eq!(phase_label(&Phase::Research, None), "Research");
        assert_eq!(phase_label(&Phase::Debate, Some(2)), "Debate Round 2");
        assert_eq!(phase_label(&Phase::Evaluate, Some(3)), "Evaluation (round 3)");
        assert_eq!(phase_label(&Phase::InitialAnalysis, Some(1)), "Initial Analysis");
    }

    #[test]
    fn test_verdict_line() {
        let verdict = Verdict {
            round: 2,
            average: 0.6,
            decision: Decision::Continue {
                target: Dimension::Practicality,
            },
        };
        assert_eq!(verdict_line(&verdict), "round 2: average 0.60, continue, refine practicality");

        let verdict = Verdict {
            round: 4,
            average: 0.9,
            decision: Decision::Stop {
                state: TerminationState::Satisfied,
            },
        };
        assert_eq!(verdict_line(&verdict), "round 4: average 0.90, stop (satisfied)");
    }

    #[test]
    fn test_coercion_line() {
        let coercion = Coercion {
            round: 1,
            turn: 1,
            speaker: "A".parse().unwrap(),
            from: ActionKind::Defend,
            to: ActionKind::Attack,
            reason: "nothing to defend yet".into(),
        };
        assert_eq!(
            coercion_line(&coercion),
            "round 1 turn 1: A defend -> attack (nothing to defend yet)"
        );
    }

    #[test]
    fn test_reporter_tracks_phase_bar() {
        let reporter = ProgressReporter::new();
        reporter.on_phase_start(&Phase::Research, None, 3);
        reporter.on_task_complete(&Phase::Research, &"A".parse().unwrap(), true);
        assert_eq!(
            reporter.phase_bar.lock().unwrap().as_ref().map(|pb| pb.position()),
            Some(1)
        );
        reporter.on_phase_complete(&Phase::Research);
        assert!(reporter.phase_bar.lock().unwrap().is_none());
    }
}
