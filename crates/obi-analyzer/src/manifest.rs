//! # Manifest Builder
//!
//! Walks a Badge Object's `@context` and derives the validation manifest.
//!
//! ## Entry Handling
//!
//! | `@context` item                 | Produces                                   |
//! |---------------------------------|--------------------------------------------|
//! | string (scalar or array item)   | one whole-document structure               |
//! | mapping `{property: namespace}` | one structure per property, at its located pointer, with the schema of the property's own `@context` |
//! | anything else                   | nothing (debug log)                        |
//!
//! Every entry is dispatched at once and the manifest is assembled after
//! all of them settle (`join_all`), in declaration order. An entry that
//! fails is logged and recorded as skipped; it never aborts the others.

use futures::future::join_all;
use obi_core::{
    AnalyzerError, ContextDeclaration, ContextEntry, JsonPointer, ResolveError, SkippedEntry,
    ValidationManifest, ValidationStructure,
};
use serde_json::Value;

use crate::locator::StructureLocator;
use crate::resolver::ContextResolver;

/// A manifest entry awaiting resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PendingEntry<'a> {
    /// A context URI governing the whole document.
    WholeDocument(&'a str),
    /// A declared extension property.
    Extension(&'a str),
}

impl PendingEntry<'_> {
    fn label(&self) -> &str {
        match self {
            Self::WholeDocument(uri) => uri,
            Self::Extension(property) => property,
        }
    }
}

/// Derives [`ValidationManifest`]s from documents.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    resolver: ContextResolver,
    locator: StructureLocator,
}

impl ManifestBuilder {
    /// Create a builder from its collaborators.
    pub fn new(resolver: ContextResolver, locator: StructureLocator) -> Self {
        Self { resolver, locator }
    }

    /// Build the manifest for `document`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidContextDeclaration`] only when
    /// `@context` is absent or neither a string nor an array. Failures of
    /// individual entries are recorded in [`ValidationManifest::skipped`].
    pub async fn build(&self, document: &Value) -> Result<ValidationManifest, AnalyzerError> {
        let declaration = ContextDeclaration::from_document(document)?;
        let pending = pending_entries(&declaration);

        tracing::debug!(entries = pending.len(), "dispatching manifest entries");
        let settled = join_all(pending.iter().map(|entry| self.settle(document, entry))).await;

        let mut structures = Vec::with_capacity(settled.len());
        let mut skipped = Vec::new();
        for (entry, result) in pending.iter().zip(settled) {
            match result {
                Ok(structure) => structures.push(structure),
                Err(e) => {
                    tracing::warn!(
                        entry = entry.label(),
                        kind = e.kind(),
                        error = %e,
                        "skipping manifest entry"
                    );
                    skipped.push(SkippedEntry::new(entry.label(), &e));
                }
            }
        }

        tracing::info!(
            structures = structures.len(),
            skipped = skipped.len(),
            "validation manifest built"
        );
        Ok(ValidationManifest::new(structures, skipped))
    }

    async fn settle(
        &self,
        document: &Value,
        entry: &PendingEntry<'_>,
    ) -> Result<ValidationStructure, ResolveError> {
        match entry {
            PendingEntry::WholeDocument(uri) => {
                let schema_ref = self.resolver.resolve_schema(uri).await?;
                Ok(ValidationStructure {
                    pointer: JsonPointer::root(),
                    context_ref: (*uri).to_string(),
                    schema_ref,
                })
            }
            PendingEntry::Extension(property) => {
                let located = self.locator.locate(document, property)?;
                let context_ref =
                    located
                        .local_context
                        .ok_or_else(|| ResolveError::MissingLocalContext {
                            property: (*property).to_string(),
                            pointer: located.pointer.label().to_string(),
                        })?;
                let schema_ref = self.resolver.resolve_schema(&context_ref).await?;
                Ok(ValidationStructure {
                    pointer: located.pointer,
                    context_ref,
                    schema_ref,
                })
            }
        }
    }
}

fn pending_entries(declaration: &ContextDeclaration) -> Vec<PendingEntry<'_>> {
    match declaration {
        ContextDeclaration::Single(uri) => vec![PendingEntry::WholeDocument(uri)],
        ContextDeclaration::Mixed(entries) => {
            let mut pending = Vec::new();
            for (index, entry) in entries.iter().enumerate() {
                match entry {
                    ContextEntry::Uri(uri) => pending.push(PendingEntry::WholeDocument(uri)),
                    ContextEntry::Extensions(declared) => pending.extend(
                        declared
                            .iter()
                            .map(|ext| PendingEntry::Extension(ext.property.as_str())),
                    ),
                    ContextEntry::Unsupported(found) => {
                        tracing::debug!(index, found, "ignoring @context entry");
                    }
                }
            }
            pending
        }
    }
}
