//! # Analyze Subcommand
//!
//! Builds the validation manifest for a badge document, validates every
//! structure, and prints the report.
//!
//! Exit codes: 0 when every structure passes, 1 when any structure has
//! violations or nothing could be validated, 2 when `@context` cannot be
//! interpreted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use obi_analyzer::report::NOTHING_TO_VALIDATE;
use obi_analyzer::{Analysis, BadgeAnalyzer};
use serde::Serialize;

use crate::input::{read_document, LoaderArgs};
use crate::render::{render_colored, summary_line};
use crate::{EXIT_FAILED, EXIT_OK, EXIT_OPERATIONAL};

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Sectioned human-readable report.
    #[default]
    Text,
    /// The report sections and skipped entries as JSON.
    Json,
}

/// Arguments for the `obi analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Badge document to analyze (JSON or YAML), or `-` for stdin.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    #[command(flatten)]
    pub loader: LoaderArgs,

    /// Disable coloured output.
    #[arg(long)]
    pub no_color: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    #[serde(flatten)]
    report: &'a obi_analyzer::Report,
    skipped: &'a [obi_core::SkippedEntry],
}

/// Execute the analyze subcommand and return the exit code.
pub async fn run_analyze(args: &AnalyzeArgs) -> Result<u8> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let document = read_document(&args.path)?;
    let config = args.loader.config()?;
    let analyzer = BadgeAnalyzer::from_config(&config).context("failed to set up analyzer")?;

    let analysis = match analyzer.analyze(&document).await {
        Ok(analysis) => analysis,
        Err(e) => {
            tracing::error!(error = %e, "cannot analyze document");
            println!("{NOTHING_TO_VALIDATE} ({e})");
            return Ok(EXIT_OPERATIONAL);
        }
    };

    print!("{}", format_analysis(&analysis, args.format)?);
    Ok(exit_code(&analysis))
}

/// Render an analysis in the requested format.
pub fn format_analysis(analysis: &Analysis, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            let mut out = render_colored(&analysis.report);
            out.push_str(&summary_line(&analysis.report, analysis.manifest.skipped()));
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Json => {
            let json = JsonReport {
                passed: analysis.report.all_passed(),
                report: &analysis.report,
                skipped: analysis.manifest.skipped(),
            };
            let mut out = serde_json::to_string_pretty(&json).context("failed to serialize report")?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Exit code for a completed analysis.
pub fn exit_code(analysis: &Analysis) -> u8 {
    if analysis.report.all_passed() {
        EXIT_OK
    } else {
        EXIT_FAILED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obi_analyzer::Report;
    use obi_core::ValidationManifest;

    #[test]
    fn empty_analysis_fails() {
        let analysis = Analysis {
            manifest: ValidationManifest::empty(),
            report: Report::default(),
        };
        assert_eq!(exit_code(&analysis), EXIT_FAILED);
    }

    #[test]
    fn json_output_is_an_object_with_sections() {
        let analysis = Analysis {
            manifest: ValidationManifest::empty(),
            report: Report::default(),
        };
        let out = format_analysis(&analysis, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["passed"], false);
        assert!(value["sections"].as_array().unwrap().is_empty());
        assert!(value["skipped"].as_array().unwrap().is_empty());
    }
}
