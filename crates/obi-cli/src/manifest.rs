//! # Manifest Subcommand
//!
//! Prints the validation manifest derived from a badge document's
//! `@context` without validating anything. Useful for checking which
//! contexts resolve and where extensions were found.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use obi_analyzer::BadgeAnalyzer;

use crate::input::{read_document, LoaderArgs};
use crate::{EXIT_FAILED, EXIT_OK, EXIT_OPERATIONAL};

/// Arguments for the `obi manifest` subcommand.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Badge document (JSON or YAML), or `-` for stdin.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub loader: LoaderArgs,
}

/// Execute the manifest subcommand. Exits 1 if the manifest is empty.
pub async fn run_manifest(args: &ManifestArgs) -> Result<u8> {
    let document = read_document(&args.path)?;
    let config = args.loader.config()?;
    let analyzer = BadgeAnalyzer::from_config(&config).context("failed to set up analyzer")?;

    let manifest = match analyzer.manifest(&document).await {
        Ok(manifest) => manifest,
        Err(e) => {
            tracing::error!(error = %e, "cannot derive manifest");
            return Ok(EXIT_OPERATIONAL);
        }
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?
    );
    Ok(if manifest.is_empty() { EXIT_FAILED } else { EXIT_OK })
}
