//! # instinct CLI
//!
//! The `instinct` binary inspects and shares the learned instinct store.
//!
//! ## Commands
//!
//! - `instinct status` - Instincts grouped by domain with decayed confidence
//! - `instinct export` - Write a decayed snapshot as YAML or JSON
//! - `instinct import` - Merge an exported file into the inherited store
//! - `instinct evolve` - Report skill, command and agent candidates
//! - `instinct config` - Print the effective configuration
//!
//! Reports go to stdout. Logs and errors go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use instinct_core::{InstinctConfig, InstinctError, InstinctService};
use tracing::debug;

mod commands;

use commands::{ConfigArgs, ExportArgs, ImportArgs, StatusArgs};

/// Inspect and share learned instincts
#[derive(Parser)]
#[command(name = "instinct")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, env = "INSTINCT_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "INSTINCT_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show instincts grouped by domain
    Status(StatusArgs),

    /// Export instincts to stdout or a file
    Export(ExportArgs),

    /// Import instincts into the inherited store
    Import(ImportArgs),

    /// Analyze instincts for skill, command and agent candidates
    Evolve,

    /// Show the effective configuration
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            if let Some(hint) = e.downcast_ref::<InstinctError>().and_then(|ie| ie.suggestion()) {
                eprintln!("  {} {}", "hint:".yellow(), hint.dimmed());
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = InstinctConfig::load(cli.config.as_deref())?;
    debug!(decay_rate = config.decay_rate, "Configuration loaded");

    let service = InstinctService::from_config(&config);
    match cli.command {
        Commands::Status(args) => commands::status::execute(&args, &service),
        Commands::Export(args) => commands::export::execute(&args, &service),
        Commands::Import(args) => commands::import::execute(&args, &service),
        Commands::Evolve => commands::evolve::execute(&service),
        Commands::Config(args) => commands::config::execute(&args, &config, cli.config.as_deref()),
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
