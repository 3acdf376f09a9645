//! Terminal prompt for settling unresolved debate points.
//!
//! Each unresolved point is shown with the positions of the participants
//! involved; the user picks one of them or leaves the point open:
//!
//! ```text
//! ═══════════════════════════════════════════════════════════════
//!   Unresolved point 1/2
//! ═══════════════════════════════════════════════════════════════
//!
//! team size  (unanswered attack)
//!
//!   1. A: A small team cannot run twelve services.
//!   2. B: Service boundaries follow team boundaries.
//!
//! decide [1-2, /defer, /quit]>
//! ```
//!
//! | Command | Aliases | Effect |
//! |---------|---------|--------|
//! | `1`..`n` | | Side with that participant |
//! | `/defer` | `defer`, `d`, `s` | Needs more discussion |
//! | `/quit` | `quit`, `q` | Leave this and every later point open |
//!
//! The prompt writes to stderr so a JSON report on stdout is untouched.

use async_trait::async_trait;
use colored::Colorize;
use philosopher_application::{DecisionError, DecisionIssue, DecisionOutcome, DecisionPort};
use philosopher_domain::UnresolvedReason;
use philosopher_domain::core::string::truncate;
use std::io::{self, BufRead, Write};

/// What one line of input asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Zero-based index into the issue's options
    Select(usize),
    Defer,
    Quit,
}

/// Parse one line typed at the prompt; `None` for anything unusable
pub fn parse_choice(input: &str, option_count: usize) -> Option<Choice> {
    let input = input.trim().to_lowercase();
    match input.as_str() {
        "/defer" | "defer" | "d" | "s" => Some(Choice::Defer),
        "/quit" | "quit" | "q" => Some(Choice::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=option_count).contains(n))
            .map(|n| Choice::Select(n - 1)),
    }
}

/// Asks the user on the terminal.
pub struct InteractiveDecision;

impl InteractiveDecision {
    pub fn new() -> Self {
        Self
    }

    fn display_issue(&self, issue: &DecisionIssue, index: usize, total: usize) {
        let rule = "═══════════════════════════════════════════════════════════════";
        eprintln!();
        eprintln!("{}", rule.yellow().bold());
        eprintln!(
            "{}",
            format!("  Unresolved point {}/{}", index + 1, total).yellow().bold()
        );
        eprintln!("{}", rule.yellow().bold());
        eprintln!();

        let reasons = issue
            .reasons
            .iter()
            .map(|r| match r {
                UnresolvedReason::UnansweredAttack => "unanswered attack",
                UnresolvedReason::DivergentStances => "divergent stances",
            })
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!("{}  {}", issue.point.bold(), format!("({})", reasons).dimmed());
        eprintln!();

        for (i, option) in issue.options.iter().enumerate() {
            eprintln!(
                "  {}. {}: {}",
                i + 1,
                option.participant.as_str().cyan(),
                truncate(&option.position, 200)
            );
        }
        eprintln!();
    }

    fn read_command(&self, option_count: usize) -> Result<String, DecisionError> {
        let range = if option_count == 0 {
            String::new()
        } else {
            format!("1-{}, ", option_count)
        };
        eprint!(
            "{} ",
            format!("decide [{}/defer, /quit]>", range).magenta().bold()
        );
        io::stderr()
            .flush()
            .map_err(|e| DecisionError::Io(format!("Failed to flush stderr: {}", e)))?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| DecisionError::Io(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            // EOF: nobody is there to answer
            return Err(DecisionError::Cancelled);
        }

        Ok(input)
    }

    fn ask(&self, issue: &DecisionIssue) -> Result<Choice, DecisionError> {
        loop {
            let input = self.read_command(issue.options.len())?;
            if input.trim().is_empty() {
                continue;
            }
            match parse_choice(&input, issue.options.len()) {
                Some(choice) => return Ok(choice),
                None => {
                    eprintln!("{} Unknown choice: {}", "!".yellow(), input.trim().red());
                }
            }
        }
    }
}

impl Default for InteractiveDecision {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecisionPort for InteractiveDecision {
    async fn decide(&self, issues: &[DecisionIssue]) -> Result<Vec<DecisionOutcome>, DecisionError> {
        let mut outcomes = Vec::with_capacity(issues.len());

        for (index, issue) in issues.iter().enumerate() {
            self.display_issue(issue, index, issues.len());
            match self.ask(issue)? {
                Choice::Select(i) => {
                    let participant = issue.options[i].participant.clone();
                    eprintln!("{} sided with {}", "v".green(), participant);
                    outcomes.push(DecisionOutcome::Selected { participant });
                }
                Choice::Defer => outcomes.push(DecisionOutcome::NeedsMoreDiscussion),
                Choice::Quit => break,
            }
        }

        // Points after a quit stay open
        outcomes.resize(issues.len(), DecisionOutcome::NeedsMoreDiscussion);
        Ok(outcomes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_choice("1\n", 2), Some(Choice::Select(0)));
        assert_eq!(parse_choice(" 2 ", 2), Some(Choice::Select(1)));
        assert_eq!(parse_choice("3", 2), None);
        assert_eq!(parse_choice("0", 2), None);
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_choice("/defer", 2), Some(Choice::Defer));
        assert_eq!(parse_choice("D", 2), Some(Choice::Defer));
        assert_eq!(parse_choice("/quit", 0), Some(Choice::Quit));
        assert_eq!(parse_choice("q", 0), Some(Choice::Quit));
        assert_eq!(parse_choice("maybe", 2), None);
    }
}
