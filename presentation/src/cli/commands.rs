//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use philosopher_domain::{Participant, ParticipantId, Provider};
use std::path::PathBuf;

/// Output format for session reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Agreed and unresolved points, or the verdict and best answer
    Summary,
    /// The full report as JSON
    Json,
}

impl From<OutputFormat> for philosopher_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Summary => philosopher_domain::OutputFormat::Summary,
            OutputFormat::Json => philosopher_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for philosopher
#[derive(Parser, Debug)]
#[command(name = "philosopher")]
#[command(author, version, about = "Structured debates and Socratic dialogues between reasoning workers")]
#[command(long_about = r#"
Philosopher runs reasoning workers through a structured session.

  debate    Three or more participants research their viewpoint in parallel,
            prepare against each other, then argue over three rotating
            rounds. Agreed and unresolved points are extracted at the end.

  socratic  A thinker answers a question while a questioner scores each
            answer and asks a follow-up, until the answer is good enough,
            stops improving, or the round limit is hit.

Configuration files are loaded from (in priority order):
1. PHILOSOPHER_* environment variables (e.g. PHILOSOPHER_TIMEOUTS__RESEARCH_SECS=60)
2. --config <path>          Explicit config file
3. ./philosopher.toml       Project-level config
4. ~/.config/philosopher/config.toml   Global config

Example:
  philosopher debate "Monolith vs microservices for a five-person team" \
      -p "A=Start with a monolith" -p "B:gemini=Microservices from day one" \
      -p "C=Modular monolith"
  philosopher socratic "When should a team adopt event sourcing?" --max-rounds 5
  philosopher check-topic "Rust vs Go for CLI tools"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format (default: from config, else summary)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Also write operational logs to a daily file in this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    pub print_default_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a structured debate
    Debate(DebateArgs),
    /// Run a Socratic dialogue
    Socratic(SocraticArgs),
    /// Score a topic with the quality gate and exit
    CheckTopic {
        /// Topic to analyze
        topic: String,
    },
}

#[derive(Args, Debug)]
pub struct DebateArgs {
    /// The debate topic
    pub topic: String,

    /// Participant as ID=VIEWPOINT or ID:PROVIDER=VIEWPOINT, in speaking
    /// order (repeat; overrides [debate.participants])
    #[arg(short, long = "participant", value_name = "SPEC", value_parser = parse_participant)]
    pub participants: Vec<Participant>,

    /// Default provider for unbound participants
    #[arg(long, value_name = "PROVIDER", value_parser = parse_provider)]
    pub provider: Option<Provider>,

    /// Run even if the topic fails the quality gate
    #[arg(long)]
    pub force: bool,

    /// Ask on the terminal how to settle unresolved points
    #[arg(short, long)]
    pub interactive: bool,

    /// Write the JSONL transcript to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SocraticArgs {
    /// The question to examine
    pub question: String,

    /// Round limit (at most 10)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_rounds: Option<u32>,

    /// Average score that ends the dialogue as satisfied
    #[arg(long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Let refinement rounds search again
    #[arg(long)]
    pub re_research: bool,

    /// Provider for the thinker and the questioner
    #[arg(long, value_name = "PROVIDER", value_parser = parse_provider)]
    pub provider: Option<Provider>,

    /// Write the JSONL transcript to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,
}

fn parse_provider(s: &str) -> Result<Provider, String> {
    s.parse().map_err(|e: philosopher_domain::UnknownProvider| e.to_string())
}

/// Parse `ID=VIEWPOINT` or `ID:PROVIDER=VIEWPOINT`
pub fn parse_participant(s: &str) -> Result<Participant, String> {
    let (head, viewpoint) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VIEWPOINT, got {:?}", s))?;
    if viewpoint.trim().is_empty() {
        return Err(format!("participant {:?} has no viewpoint", head.trim()));
    }

    let (id, provider) = match head.split_once(':') {
        Some((id, provider)) => (id, Some(parse_provider(provider)?)),
        None => (head, None),
    };
    let id = ParticipantId::try_new(id).ok_or_else(|| format!("invalid participant id {:?}", id))?;

    let participant = Participant::new(id, viewpoint.trim());
    Ok(match provider {
        Some(provider) => participant.with_provider(provider),
        None => participant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_participant() {
        let p = parse_participant("A=Start with a monolith").unwrap();
        assert_eq!(p.id.as_str(), "A");
        assert_eq!(p.viewpoint.as_str(), "Start with a monolith");
        assert_eq!(p.provider, None);

        let p = parse_participant("B:gpt=Microservices = scale").unwrap();
        assert_eq!(p.provider, Some(Provider::Codex));
        assert_eq!(p.viewpoint.as_str(), "Microservices = scale");
    }

    #[test]
    fn test_parse_participant_errors() {
        assert!(parse_participant("A").is_err());
        assert!(parse_participant("A=  ").is_err());
        assert!(parse_participant("=view").is_err());
        assert!(parse_participant("A:llama=view").is_err());
    }

    #[test]
    fn test_debate_command() {
        let cli = Cli::try_parse_from([
            "philosopher",
            "-vv",
            "debate",
            "Rust vs Go",
            "-p",
            "A=Rust",
            "-p",
            "B:gemini=Go",
            "--force",
            "-o",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        let Some(Command::Debate(args)) = cli.command else {
            panic!("expected debate");
        };
        assert_eq!(args.topic, "Rust vs Go");
        assert_eq!(args.participants.len(), 2);
        assert!(args.force);
        assert!(!args.interactive);
    }

    #[test]
    fn test_socratic_round_limit() {
        let cli = Cli::try_parse_from(["philosopher", "socratic", "Why?", "--max-rounds", "4"])
            .unwrap();
        let Some(Command::Socratic(args)) = cli.command else {
            panic!("expected socratic");
        };
        assert_eq!(args.max_rounds, Some(4));

        assert!(
            Cli::try_parse_from(["philosopher", "socratic", "Why?", "--max-rounds", "11"]).is_err()
        );
    }

    #[test]
    fn test_show_config_without_subcommand() {
        let cli = Cli::try_parse_from(["philosopher", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.command.is_none());
    }
}
