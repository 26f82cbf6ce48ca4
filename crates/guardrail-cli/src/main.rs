//! # guardrail CLI Entry Point
//!
//! Initializes tracing, loads guard configuration and dispatches to the
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use guardrail_cli::config::GuardConfig;
use tracing_subscriber::EnvFilter;

/// Runtime guards from the command line.
///
/// Checks values against strict-equality and type guards and prints the
/// error-info record of any failure.
#[derive(Parser, Debug)]
#[command(name = "guardrail", version, about)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Guard configuration file (YAML or JSON). Falls back to GUARDRAIL_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the effective alias table.
    Aliases(guardrail_cli::aliases::AliasesArgs),
    /// Type-check a document of {type: values} entries.
    Check(guardrail_cli::check::CheckArgs),
    /// Compare two JSON values under strict equality.
    Ensure(guardrail_cli::ensure::EnsureArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: &Cli) -> anyhow::Result<u8> {
    let guard = GuardConfig::load(cli.config.as_deref())?.into_guard();
    match &cli.command {
        Commands::Aliases(args) => guardrail_cli::aliases::run_aliases(args, &guard),
        Commands::Check(args) => guardrail_cli::check::run_check(args),
        Commands::Ensure(args) => guardrail_cli::ensure::run_ensure(args, &guard),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
