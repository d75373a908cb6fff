//! # Report Aggregation
//!
//! Validates every structure in a manifest and joins the outcomes into a
//! [`Report`]. Validations run concurrently; sections always come out in
//! manifest order.
//!
//! The plain-text rendering ([`Report`]'s `Display`) is a pure function of
//! the sections, so two runs over the same document print the same bytes.
//! Colour is left to the caller.

use std::fmt;

use futures::future::join_all;
use obi_core::{ValidationManifest, ValidationStructure};
use obi_schema::{SchemaValidator, ValidationOutcome, Violation};
use serde::Serialize;
use serde_json::Value;

/// Rule printed on both sides of a section label.
pub const SECTION_RULE: &str = "=============================";

/// Printed under a section whose sub-document passed.
pub const PASS_MARKER: &str =
    "PASS: validation of this object against its schema passed with no errors.";

/// Printed before a section's violations.
pub const FAILURE_HEADING: &str = "Schema validation errors follow:";

/// Printed instead of sections when the manifest is empty.
pub const NOTHING_TO_VALIDATE: &str =
    "Nothing to validate: no validation structures could be derived from @context.";

/// Keyword of the violation raised when a structure's pointer does not
/// resolve in the document it is applied to.
pub const POINTER_KEYWORD: &str = "pointer";

/// One validated structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSection {
    /// The structure that was validated.
    #[serde(flatten)]
    pub structure: ValidationStructure,
    /// Whether the sub-document passed.
    pub passed: bool,
    /// Violations, empty when passed.
    pub violations: Vec<Violation>,
}

impl ReportSection {
    fn new(structure: ValidationStructure, outcome: ValidationOutcome) -> Self {
        Self {
            structure,
            passed: outcome.is_pass(),
            violations: outcome.violations().to_vec(),
        }
    }

    /// `==== label ====` header line.
    pub fn header(&self) -> String {
        format!(
            "{SECTION_RULE} {} {SECTION_RULE}",
            self.structure.pointer.label()
        )
    }

    /// `Schema applied: ...` line.
    pub fn schema_line(&self) -> String {
        format!("Schema applied: {}", self.structure.schema_ref)
    }
}

/// The aggregated validation report for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    sections: Vec<ReportSection>,
}

impl Report {
    /// Sections in manifest order.
    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Whether the manifest was empty.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// At least one section, and every section passed.
    pub fn all_passed(&self) -> bool {
        !self.sections.is_empty() && self.sections.iter().all(|s| s.passed)
    }

    /// Total number of violations across sections.
    pub fn violation_count(&self) -> usize {
        self.sections.iter().map(|s| s.violations.len()).sum()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sections.is_empty() {
            return writeln!(f, "{NOTHING_TO_VALIDATE}");
        }
        for section in &self.sections {
            writeln!(f, "{}", section.header())?;
            writeln!(f, "{}", section.schema_line())?;
            if section.passed {
                writeln!(f, "{PASS_MARKER}")?;
            } else {
                writeln!(f, "{FAILURE_HEADING}")?;
                for violation in &section.violations {
                    writeln!(f, "  {violation}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Runs the validator over a manifest.
#[derive(Debug, Clone)]
pub struct ReportAggregator {
    validator: SchemaValidator,
}

impl ReportAggregator {
    /// Create an aggregator around a validator.
    pub fn new(validator: SchemaValidator) -> Self {
        Self { validator }
    }

    /// Validate every structure of `manifest` against `document`.
    pub async fn build_report(&self, document: &Value, manifest: &ValidationManifest) -> Report {
        let outcomes = join_all(
            manifest
                .iter()
                .map(|structure| self.validate_structure(document, structure)),
        )
        .await;

        let sections: Vec<ReportSection> = manifest
            .iter()
            .cloned()
            .zip(outcomes)
            .map(|(structure, outcome)| ReportSection::new(structure, outcome))
            .collect();

        tracing::info!(
            sections = sections.len(),
            failed = sections.iter().filter(|s| !s.passed).count(),
            "validation report built"
        );
        Report { sections }
    }

    async fn validate_structure(
        &self,
        document: &Value,
        structure: &ValidationStructure,
    ) -> ValidationOutcome {
        match structure.pointer.resolve(document) {
            Some(sub_document) => {
                tracing::debug!(
                    pointer = structure.pointer.label(),
                    schema_ref = %structure.schema_ref,
                    "validating structure"
                );
                self.validator
                    .validate(sub_document, &structure.schema_ref)
                    .await
            }
            None => ValidationOutcome::failed(vec![Violation {
                instance_path: structure.pointer.as_str().to_string(),
                schema_path: String::new(),
                keyword: POINTER_KEYWORD.to_string(),
                expected: "pointer must resolve to a value in the document".to_string(),
                actual: None,
                message: format!("{} does not resolve", structure.pointer.label()),
            }]),
        }
    }
}
