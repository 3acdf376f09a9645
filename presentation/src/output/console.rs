//! Console output formatter for session reports

use colored::Colorize;
use philosopher_application::{DebateReport, DecisionOutcome, SocraticReport};
use philosopher_domain::{TerminationState, TopicAnalysis, UnresolvedReason};
use serde::Serialize;

/// Formats session reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Agreed and unresolved points, decisions and every degradation
    pub fn format_debate(report: &DebateReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Debate Results"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Topic:".cyan().bold(), report.topic));

        output.push_str(&format!("{}\n", "Participants:".cyan().bold()));
        for p in &report.participants {
            let provider = p
                .provider
                .map(|pr| format!(" [{}]", pr))
                .unwrap_or_default();
            output.push_str(&format!("  {}{}: {}\n", p.id.as_str().bold(), provider, p.viewpoint.as_str()));
        }
        output.push_str(&format!(
            "\n{} {} after {} round(s)\n",
            "Outcome:".cyan().bold(),
            Self::termination_label(report.termination),
            report.rounds_completed
        ));

        output.push_str(&Self::section_header("Agreed"));
        if report.consensus.agreed.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for point in &report.consensus.agreed {
            output.push_str(&format!(
                "  {} {} {}\n",
                "*".green(),
                point.point,
                format!("({})", Self::join(&point.backers)).dimmed()
            ));
        }

        output.push_str(&Self::section_header("Unresolved"));
        if report.consensus.unresolved.is_empty() {
            output.push_str(&format!("  {}\n", "(none)".dimmed()));
        }
        for point in &report.consensus.unresolved {
            let reasons = point
                .reasons
                .iter()
                .map(|r| Self::reason_label(*r))
                .collect::<Vec<_>>()
                .join(", ");
            output.push_str(&format!(
                "  {} {} {}\n",
                "?".yellow(),
                point.point,
                format!("({})", reasons).dimmed()
            ));
        }

        if !report.consensus.standing.is_empty() {
            output.push_str(&Self::section_header("Standing"));
            for point in &report.consensus.standing {
                output.push_str(&format!(
                    "  - {} {}\n",
                    point.point,
                    format!("({})", Self::join(&point.backers)).dimmed()
                ));
            }
        }

        if !report.decisions.is_empty() {
            output.push_str(&Self::section_header("Decisions"));
            for record in &report.decisions {
                let outcome = match &record.outcome {
                    DecisionOutcome::Selected { participant } => {
                        format!("sided with {}", participant).green().to_string()
                    }
                    DecisionOutcome::NeedsMoreDiscussion => {
                        "needs more discussion".yellow().to_string()
                    }
                };
                output.push_str(&format!("  {}: {}\n", record.point, outcome));
            }
        }

        if !report.stances.is_empty() {
            output.push_str(&Self::section_header("Final Stances"));
            for stance in &report.stances {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("── {} ──", stance.participant).yellow().bold(),
                    Self::indent(&stance.summary, "  ")
                ));
                if let Some(proposal) = &stance.consensus_proposal {
                    output.push_str(&format!("  {} {}\n", "Proposal:".dimmed(), proposal));
                }
            }
        }

        if report.is_degraded() || !report.substitutions.is_empty() {
            output.push_str(&Self::section_header("Degraded"));
            for failure in &report.failures {
                let round = failure
                    .round
                    .map(|r| format!(" round {}", r))
                    .unwrap_or_default();
                output.push_str(&format!(
                    "  {} {} in {}{}: {} ({})\n",
                    "x".red(),
                    failure.participant,
                    failure.phase,
                    round,
                    failure.kind,
                    failure.message
                ));
            }
            for coercion in &report.coercions {
                output.push_str(&format!(
                    "  {} {} round {} turn {}: {} -> {} ({})\n",
                    "!".yellow(),
                    coercion.speaker,
                    coercion.round,
                    coercion.turn,
                    coercion.from,
                    coercion.to,
                    coercion.reason
                ));
            }
            for sub in &report.substitutions {
                output.push_str(&format!(
                    "  {} {} ran on {} instead of {}\n",
                    "~".yellow(),
                    sub.participant,
                    sub.substituted,
                    sub.requested
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Verdict, best answer and score trajectory
    pub fn format_socratic(report: &SocraticReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Socratic Dialogue"));
        output.push('\n');

        output.push_str(&format!("{} {}\n\n", "Question:".cyan().bold(), report.question));
        output.push_str(&format!(
            "{} {} after {} round(s)\n",
            "Outcome:".cyan().bold(),
            Self::termination_label(report.termination),
            report.rounds_completed
        ));

        if !report.score_history.is_empty() {
            let scores = report
                .score_history
                .iter()
                .map(|s| format!("{:.2}", s))
                .collect::<Vec<_>>()
                .join(" -> ");
            output.push_str(&format!("{} {}\n", "Scores:".cyan().bold(), scores));
        }

        if let Some(best) = &report.best_answer {
            output.push_str(&Self::section_header(&format!(
                "Best Answer (round {}, average {:.2})",
                best.round, best.average
            )));
            output.push_str(&format!("\n{}\n", best.answer.answer));
        } else if let Some(answer) = &report.final_answer {
            output.push_str(&Self::section_header("Answer (unevaluated)"));
            output.push_str(&format!("\n{}\n", answer.answer));
        }

        if !report.qa_history.is_empty() {
            output.push_str(&Self::section_header("Questions Raised"));
            for entry in &report.qa_history {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    format!("[{}]", entry.round).dimmed(),
                    entry.question,
                    format!("(weakest: {})", entry.evaluation.weakest()).dimmed()
                ));
            }
        }

        if !report.failures.is_empty() {
            output.push_str(&Self::section_header("Degraded"));
            for failure in &report.failures {
                output.push_str(&format!(
                    "  {} {} in {}: {} ({})\n",
                    "x".red(),
                    failure.participant,
                    failure.phase,
                    failure.kind,
                    failure.message
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Per-dimension scores and, for a rejected topic, what to fix
    pub fn format_topic_analysis(analysis: &TopicAnalysis) -> String {
        let mut output = String::new();

        let verdict = if analysis.is_valid {
            "accepted".green().bold()
        } else {
            "rejected".red().bold()
        };
        output.push_str(&format!(
            "{} {} ({} {:.2}{})\n",
            "Topic".cyan().bold(),
            verdict,
            "overall",
            analysis.overall_score,
            if analysis.is_technical { ", technical" } else { "" }
        ));

        for d in &analysis.dimensions {
            output.push_str(&format!(
                "  {:<14} {:.2}  {}\n",
                d.dimension.as_str(),
                d.score,
                d.reason.dimmed()
            ));
            if !analysis.is_valid
                && let Some(suggestion) = &d.suggestion
            {
                output.push_str(&format!("  {:<14} {} {}\n", "", "->".yellow(), suggestion));
            }
        }

        if let Some(issue) = &analysis.primary_issue {
            output.push_str(&format!("\n{} {}\n", "Issue:".yellow().bold(), issue));
        }

        output
    }

    /// Format any report as pretty JSON
    pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn termination_label(state: TerminationState) -> String {
        match state {
            TerminationState::Satisfied => "satisfied".green().to_string(),
            TerminationState::Stagnated => "stagnated".yellow().to_string(),
            TerminationState::MaxRoundsReached => "max rounds reached".to_string(),
            TerminationState::Running => "interrupted".red().to_string(),
        }
    }

    fn reason_label(reason: UnresolvedReason) -> &'static str {
        match reason {
            UnresolvedReason::UnansweredAttack => "unanswered attack",
            UnresolvedReason::DivergentStances => "divergent stances",
        }
    }

    fn join<T: std::fmt::Display>(items: &[T]) -> String {
        items
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use philosopher_application::{DecisionRecord, ProviderSubstitution};
    use philosopher_domain::{
        Answer, BestAnswer, ConsensusPoint, ConsensusReport, FailureKind, Participant, Phase,
        PhaseFailure, Provider, Topic, UnresolvedPoint, analyze_topic,
    };

    fn plain() {
        colored::control::set_override(false);
    }

    fn debate_report() -> DebateReport {
        DebateReport {
            topic: Topic::new("Monolith vs microservices").unwrap(),
            participants: vec![
                Participant::new("A".parse().unwrap(), "Monolith").with_provider(Provider::Gemini),
                Participant::new("B".parse().unwrap(), "Microservices"),
            ],
            termination: TerminationState::MaxRoundsReached,
            rounds_completed: 3,
            research: Default::default(),
            history: vec![],
            stances: vec![],
            consensus: ConsensusReport {
                agreed: vec![ConsensusPoint {
                    point: "shared baseline".into(),
                    backers: vec!["A".parse().unwrap(), "B".parse().unwrap()],
                }],
                unresolved: vec![UnresolvedPoint {
                    point: "team size".into(),
                    reasons: vec![UnresolvedReason::UnansweredAttack],
                    owners: vec!["A".parse().unwrap()],
                    attackers: vec!["B".parse().unwrap()],
                }],
                standing: vec![],
            },
            decisions: vec![DecisionRecord {
                point: "team size".into(),
                outcome: DecisionOutcome::NeedsMoreDiscussion,
            }],
            failures: vec![PhaseFailure::new(
                "B".parse().unwrap(),
                Phase::Research,
                None,
                FailureKind::WorkerTimeout,
                "no answer within 120s",
            )],
            coercions: vec![],
            substitutions: vec![ProviderSubstitution {
                participant: "A".parse().unwrap(),
                requested: Provider::Gemini,
                substituted: Provider::Claude,
            }],
        }
    }

    #[test]
    fn test_format_debate() {
        plain();
        let text = ConsoleFormatter::format_debate(&debate_report());
        assert!(text.contains("Topic: Monolith vs microservices"));
        assert!(text.contains("A [gemini]: Monolith"));
        assert!(text.contains("* shared baseline (A, B)"));
        assert!(text.contains("? team size (unanswered attack)"));
        assert!(text.contains("team size: needs more discussion"));
        assert!(text.contains("B in Research: worker timeout"));
        assert!(text.contains("A ran on claude instead of gemini"));
        assert!(!text.contains("Final Stances"));
    }

    #[test]
    fn test_format_socratic() {
        plain();
        let report = SocraticReport {
            question: Topic::new("When should a team adopt event sourcing?").unwrap(),
            termination: TerminationState::Satisfied,
            rounds_completed: 2,
            final_answer: Some(Answer::new("late", "late")),
            best_answer: Some(BestAnswer {
                round: 2,
                average: 0.9,
                answer: Answer::new("When audit history is a product requirement.", "audit"),
            }),
            qa_history: vec![],
            score_history: vec![0.5, 0.9],
            verdicts: vec![],
            failures: vec![],
        };
        let text = ConsoleFormatter::format_socratic(&report);
        assert!(text.contains("Outcome: satisfied after 2 round(s)"));
        assert!(text.contains("Scores: 0.50 -> 0.90"));
        assert!(text.contains("Best Answer (round 2, average 0.90)"));
        assert!(text.contains("When audit history is a product requirement."));
        assert!(!text.contains("late"));
    }

    #[test]
    fn test_format_rejected_topic() {
        plain();
        let analysis = analyze_topic("It");
        let text = ConsoleFormatter::format_topic_analysis(&analysis);
        assert!(text.contains("Topic rejected"));
        assert!(text.contains("clarity"));
        assert!(text.contains("Issue:"));
    }

    #[test]
    fn test_format_json() {
        let json = ConsoleFormatter::format_json(&debate_report());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["termination"], "max_rounds_reached");
        assert_eq!(value["consensus"]["agreed"][0]["point"], "shared baseline");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
