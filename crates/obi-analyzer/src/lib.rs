//! # obi-analyzer: Badge Object Analysis Pipeline
//!
//! Turns a Badge Object into a validation report in two phases.
//!
//! 1. **Manifest.** [`ManifestBuilder`] reads `@context`, resolves each
//!    context entry to a schema through [`ContextResolver`], and finds
//!    extended sub-objects with [`StructureLocator`]. The result is a
//!    [`ValidationManifest`] of (pointer, schema) pairs.
//! 2. **Report.** [`ReportAggregator`] validates each located sub-document
//!    against its schema and joins the outcomes into a [`Report`].
//!
//! [`BadgeAnalyzer`] wires both phases together from an
//! [`AnalyzerConfig`], or from injected collaborators in tests.
//!
//! ## Crate Policy
//!
//! - The document loader and schema store are injected
//!   (`Arc<dyn DocumentLoader>`, `Arc<dyn SchemaStore>`).
//! - Fan-out is `futures::future::join_all` on the calling task. No
//!   shared mutable state, no spawned tasks.
//! - Only an uninterpretable `@context` fails an analysis; every other
//!   problem is a skipped entry or a violation in the report.

pub mod config;
pub mod error;
pub mod locator;
pub mod manifest;
pub mod report;
pub mod resolver;

pub use config::{default_scopes, AnalyzerConfig};
pub use error::SetupError;
pub use locator::{LocatedProperty, StructureLocator};
pub use manifest::ManifestBuilder;
pub use report::{Report, ReportAggregator, ReportSection};
pub use resolver::ContextResolver;

use std::sync::Arc;

use obi_core::{AnalyzerError, ValidationManifest};
use obi_loader::{DocumentLoader, TieredDocumentLoader};
use obi_schema::{LayeredSchemaStore, LocalSchemaStore, SchemaStore, SchemaValidator};
use serde_json::Value;

/// Result of a full analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// The derived manifest, including skipped entries.
    pub manifest: ValidationManifest,
    /// The validation report.
    pub report: Report,
}

/// Manifest building and report aggregation behind one entry point.
#[derive(Debug, Clone)]
pub struct BadgeAnalyzer {
    builder: ManifestBuilder,
    aggregator: ReportAggregator,
}

impl BadgeAnalyzer {
    /// Assemble an analyzer from explicit collaborators.
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        store: Arc<dyn SchemaStore>,
        locator: StructureLocator,
    ) -> Self {
        Self {
            builder: ManifestBuilder::new(ContextResolver::new(loader), locator),
            aggregator: ReportAggregator::new(SchemaValidator::new(store)),
        }
    }

    /// Build the production analyzer: tiered loader, built-in schemas plus
    /// the configured directory, remote schemas through the same loader.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the HTTP client cannot be built or the
    /// schema directory cannot be read.
    pub fn from_config(config: &AnalyzerConfig) -> Result<Self, SetupError> {
        let loader: Arc<dyn DocumentLoader> = Arc::new(TieredDocumentLoader::new(&config.loader)?);

        let mut local = LocalSchemaStore::builtin()?;
        if let Some(dir) = &config.schema_dir {
            local = local.with_dir(dir)?;
        }
        tracing::debug!(schemas = local.schema_count(), "schema store ready");
        let store = Arc::new(LayeredSchemaStore::new(local, Arc::clone(&loader)));

        Ok(Self::new(
            loader,
            store,
            StructureLocator::new(config.scopes.clone()),
        ))
    }

    /// Phase one only.
    pub async fn manifest(&self, document: &Value) -> Result<ValidationManifest, AnalyzerError> {
        self.builder.build(document).await
    }

    /// Phase two only, over a manifest built earlier.
    pub async fn report(&self, document: &Value, manifest: &ValidationManifest) -> Report {
        self.aggregator.build_report(document, manifest).await
    }

    /// Both phases.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidContextDeclaration`] when `@context`
    /// is absent or neither a string nor an array.
    pub async fn analyze(&self, document: &Value) -> Result<Analysis, AnalyzerError> {
        let manifest = self.manifest(document).await?;
        let report = self.report(document, &manifest).await;
        Ok(Analysis { manifest, report })
    }
}
