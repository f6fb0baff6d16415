//! @ai:module:intent CLI entry point for validating and scoring triage submissions
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on pipeline, output, config, task

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use triage_eval::{output, pipeline, task, Config, ExitStatus, Invocation, OutputFormat};

#[derive(Parser)]
#[command(name = "triage-eval")]
#[command(author, version, about = "Validate and score four-class triage shared-task submissions")]
struct Cli {
    /// Submission file: one `<id><TAB><label>` line per message
    #[arg(required_unless_present = "list_tasks")]
    submission: Option<PathBuf>,

    /// Check identifiers against the expected set of a bundled task
    #[arg(long)]
    task: Option<String>,

    /// Gold-standard file to score the submission against
    #[arg(long)]
    gold: Option<PathBuf>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    format: Format,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Do not list submission identifiers that have no gold label
    #[arg(long)]
    hide_unscored: bool,

    /// Summarize identifier lists longer than this
    #[arg(long)]
    max_listed: Option<usize>,

    /// List bundled tasks and exit
    #[arg(long)]
    list_tasks: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    JsonPretty,
}

impl From<Format> for OutputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
            Format::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing();

    if cli.list_tasks {
        list_tasks();
        return ExitStatus::Success.into();
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitStatus::InvalidInput.into();
        }
    };

    let Some(submission) = cli.submission else {
        eprintln!("Error: a submission file is required");
        return ExitStatus::InvalidInput.into();
    };

    let invocation = Invocation {
        submission,
        task: cli.task,
        gold: cli.gold,
    };

    let report = pipeline::run(&invocation);
    let rendered = output::render(&report, cli.format.into(), &config.report);

    if !rendered.stdout.is_empty() {
        print!("{}", rendered.stdout);

        if !rendered.stdout.ends_with('\n') {
            println!();
        }
    }
    eprint!("{}", rendered.stderr);

    report.status.into()
}

const DEFAULT_LOG_FILTER: &str = "triage_eval=warn";

/// @ai:intent Log to stderr, filtered by RUST_LOG, quiet by default
/// @ai:effects io
fn init_tracing() {
    let directives = std::env::var("RUST_LOG").ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(directives.as_deref()))
        .init();
}

/// @ai:intent Use the given directives, falling back to warnings when absent or invalid
/// @ai:effects pure
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// @ai:intent Load the config file if given, then apply CLI overrides
/// @ai:effects fs:read
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match cli.config.as_deref() {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };

    config
        .report
        .apply_overrides(cli.hide_unscored, cli.max_listed);

    Ok(config)
}

fn load_config_file(path: &Path) -> anyhow::Result<Config> {
    let config = Config::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// @ai:intent Print bundled task names, descriptions and id counts
/// @ai:effects io
fn list_tasks() {
    for task in task::registry().iter() {
        let note = if task.placeholder {
            "  (placeholder ids, not the official list)"
        } else {
            ""
        };
        println!(
            "{:<12}{:>6} ids  {}{}",
            task.name,
            task.len(),
            task.description,
            note
        );
    }
}
