//! # obi CLI entry point
//!
//! Parses command-line arguments, installs logging and dispatches to the
//! subcommand handlers on a single-threaded runtime.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use obi_cli::analyze::{run_analyze, AnalyzeArgs};
use obi_cli::manifest::{run_manifest, ManifestArgs};
use obi_cli::EXIT_OPERATIONAL;

/// Open Badges object analyzer.
///
/// Derives the schemas a badge document must satisfy from its `@context`
/// (including scoped extensions) and validates each part against them.
#[derive(Parser, Debug)]
#[command(name = "obi", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    /// Ignored when RUST_LOG is set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a badge document and print the report.
    Analyze(AnalyzeArgs),

    /// Print the validation manifest derived from @context.
    Manifest(ManifestArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("obi CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to start async runtime: {e}");
            return ExitCode::from(EXIT_OPERATIONAL);
        }
    };

    let result = runtime.block_on(async {
        match &cli.command {
            Commands::Analyze(args) => run_analyze(args).await,
            Commands::Manifest(args) => run_manifest(args).await,
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_OPERATIONAL)
        }
    }
}

fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
