//! CLI entrypoint for philosopher
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use philosopher_application::{
    ConversationLogger, DecisionPort, DeferDecision, NoConversationLogger, NoProgress,
    ProgressNotifier, ProviderSubstitution, RunDebateInput, RunDebateUseCase, RunSocraticInput,
    RunSocraticUseCase, resolve_providers,
};
use philosopher_domain::{
    Participant, ParticipantId, Provider, ProviderConfig, Topic, analyze_topic,
};
use philosopher_infrastructure::{
    ConfigLoader, FileConfig, JsonlConversationLogger, PathProviderProbe, RoutingWorkerGateway,
};
use philosopher_presentation::{
    Cli, Command, DebateArgs, InteractiveDecision, OutputConfig, ProgressReporter, Report,
    SimpleProgress, SocraticArgs,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", ConfigLoader::default_toml()?);
        return Ok(());
    }
    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?
    };
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {}", issue);
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    let log_dir = cli.log_dir.clone().or_else(|| config.logging.log_dir.clone());
    // Dropping the guard flushes the log file
    let _log_guard = init_logging(cli.verbose, log_dir.as_deref());

    info!("Starting philosopher");

    let output = OutputConfig::resolve(&cli, config.output.format, config.output.color);
    output.apply_color();

    match cli.command {
        Some(Command::Debate(args)) => run_debate(args, &config, &output, log_dir.as_deref()).await,
        Some(Command::Socratic(args)) => {
            run_socratic(args, &config, &output, log_dir.as_deref()).await
        }
        Some(Command::CheckTopic { topic }) => {
            let analysis = analyze_topic(&topic);
            println!("{}", analysis.render(output.format));
            if !analysis.is_valid {
                bail!("Topic rejected by the quality gate");
            }
            Ok(())
        }
        None => bail!("No command given. Run `philosopher --help` for usage."),
    }
}

/// Install the stderr subscriber, plus a daily file when `log_dir` is set
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "philosopher.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(false)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .init();

    guard
}

async fn run_debate(
    args: DebateArgs,
    config: &FileConfig,
    output: &OutputConfig,
    log_dir: Option<&Path>,
) -> Result<()> {
    if config.debate.topic_gate && !args.force {
        let analysis = analyze_topic(&args.topic);
        if !analysis.is_valid {
            eprintln!("{}", analysis.summary());
            bail!(
                "Topic rejected by the quality gate ({}). Use --force to debate it anyway.",
                analysis.primary_issue.as_deref().unwrap_or("low overall score")
            );
        }
    }
    let topic = Topic::new(args.topic)?;

    let participants = if args.participants.is_empty() {
        config.debate.to_participants()?
    } else {
        args.participants
    };

    let providers = config.providers.to_provider_config()?;
    let default = args.provider.unwrap_or(providers.default);
    let (participants, substitutions, gateway) = wire_providers(participants, &providers, default)?;

    let use_case = RunDebateUseCase::new(gateway)
        .with_params(config.timeouts.to_execution_params())
        .with_conversation_logger(transcript_logger(
            args.transcript,
            config,
            log_dir,
            "debate",
        )?)
        .with_decision_port(decision_port(args.interactive));

    let input = RunDebateInput::new(topic, participants).with_substitutions(substitutions);
    let report = use_case
        .execute_with_progress(input, progress_for(output).as_ref())
        .await?;

    if report.is_degraded() {
        warn!(
            "Debate finished degraded: {} failure(s), {} coercion(s)",
            report.failures.len(),
            report.coercions.len()
        );
    }
    println!("{}", report.render(output.format));
    Ok(())
}

async fn run_socratic(
    args: SocraticArgs,
    config: &FileConfig,
    output: &OutputConfig,
    log_dir: Option<&Path>,
) -> Result<()> {
    let question = Topic::new(args.question)?;

    let mut policy = config.socratic.to_policy();
    if let Some(rounds) = args.max_rounds {
        policy.max_rounds = rounds;
    }
    if let Some(threshold) = args.threshold {
        if !(0.0..=1.0).contains(&threshold) {
            bail!("--threshold must be within [0.0, 1.0], got {}", threshold);
        }
        policy.satisfaction_threshold = threshold;
    }

    let providers = config.providers.to_provider_config()?;
    let default = args.provider.unwrap_or(providers.default);
    let roles = vec![
        Participant::new(ParticipantId::thinker(), "thinker"),
        Participant::new(ParticipantId::questioner(), "questioner"),
    ];
    let (_, _, gateway) = wire_providers(roles, &providers, default)?;

    let use_case = RunSocraticUseCase::new(gateway)
        .with_params(config.timeouts.to_execution_params())
        .with_conversation_logger(transcript_logger(
            args.transcript,
            config,
            log_dir,
            "socratic",
        )?);

    let input = RunSocraticInput::new(question)
        .with_policy(policy)
        .with_re_research(args.re_research || config.socratic.allow_re_research);
    let report = use_case
        .execute_with_progress(input, progress_for(output).as_ref())
        .await?;

    println!("{}", report.render(output.format));
    Ok(())
}

/// Probe providers, substitute unavailable ones and build the routing gateway
fn wire_providers(
    participants: Vec<Participant>,
    providers: &ProviderConfig,
    default: Provider,
) -> Result<(
    Vec<Participant>,
    Vec<ProviderSubstitution>,
    Arc<RoutingWorkerGateway>,
)> {
    let probe = PathProviderProbe::new(providers.clone());
    let resolution = resolve_providers(participants, default, &probe)?;
    for sub in &resolution.substitutions {
        eprintln!(
            "note: {} requested {} which is unavailable, using {}",
            sub.participant, sub.requested, sub.substituted
        );
    }

    let gateway = RoutingWorkerGateway::from_config(providers)
        .with_participants(&resolution.participants)
        .with_default(default);
    Ok((resolution.participants, resolution.substitutions, Arc::new(gateway)))
}

/// `--transcript`, else `[logging] transcript`, else a timestamped file in the log dir
fn transcript_logger(
    explicit: Option<PathBuf>,
    config: &FileConfig,
    log_dir: Option<&Path>,
    mode: &str,
) -> Result<Arc<dyn ConversationLogger>> {
    let path = explicit
        .or_else(|| config.logging.transcript.clone())
        .or_else(|| log_dir.map(|dir| JsonlConversationLogger::timestamped_path(dir, mode)));

    let Some(path) = path else {
        return Ok(Arc::new(NoConversationLogger));
    };
    let logger = JsonlConversationLogger::create(&path)
        .with_context(|| format!("Failed to create transcript {}", path.display()))?;
    info!("Writing transcript to {}", logger.path().display());
    Ok(Arc::new(logger))
}

fn decision_port(interactive: bool) -> Arc<dyn DecisionPort> {
    if interactive {
        Arc::new(InteractiveDecision::new())
    } else {
        Arc::new(DeferDecision)
    }
}

fn progress_for(output: &OutputConfig) -> Box<dyn ProgressNotifier> {
    if !output.show_progress {
        Box::new(NoProgress)
    } else if output.fancy_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    }
}
