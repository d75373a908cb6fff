//! Terminal rendering of analysis reports.
//!
//! Same layout as the report's plain `Display`; only colour is added.
//! With colour disabled (`--no-color` or `CLICOLOR=0`) the output is
//! byte-identical to the plain rendering.

use std::fmt::Write;

use colored::Colorize;
use obi_analyzer::report::{FAILURE_HEADING, NOTHING_TO_VALIDATE, PASS_MARKER};
use obi_analyzer::Report;
use obi_core::SkippedEntry;

/// Render `report` with section headers in bold, passes in green and
/// violations in yellow.
pub fn render_colored(report: &Report) -> String {
    let mut out = String::new();
    if report.is_empty() {
        let _ = writeln!(out, "{}", NOTHING_TO_VALIDATE.yellow());
        return out;
    }
    for section in report.sections() {
        let _ = writeln!(out, "{}", section.header().bold());
        let _ = writeln!(out, "{}", section.schema_line());
        if section.passed {
            let _ = writeln!(out, "{}", PASS_MARKER.green());
        } else {
            let _ = writeln!(out, "{}", FAILURE_HEADING.red());
            for violation in &section.violations {
                let _ = writeln!(out, "  {}", violation.to_string().yellow());
            }
        }
        let _ = writeln!(out);
    }
    out
}

/// One-line summary for the end of a text report.
pub fn summary_line(report: &Report, skipped: &[SkippedEntry]) -> String {
    let failed = report.sections().iter().filter(|s| !s.passed).count();
    let mut line = format!(
        "{}/{} structure(s) passed, {} violation(s)",
        report.sections().len() - failed,
        report.sections().len(),
        report.violation_count()
    );
    if !skipped.is_empty() {
        let _ = write!(line, ", {} context entr(ies) skipped", skipped.len());
    }
    line
}
