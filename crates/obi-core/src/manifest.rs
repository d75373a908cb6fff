//! # Validation Manifest
//!
//! The manifest lists every (pointer, schema) pair to validate for one
//! document. Structures are only ever created with a resolved schema
//! reference; entries that could not be resolved are kept separately as
//! [`SkippedEntry`] diagnostics and never reach the report.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ResolveError;
use crate::pointer::JsonPointer;

/// One sub-document to validate and the schema that governs it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationStructure {
    /// Location of the sub-document within the Badge Object.
    pub pointer: JsonPointer,
    /// URI of the context that governs the sub-document.
    pub context_ref: String,
    /// URI of the schema declared by that context.
    pub schema_ref: String,
}

/// A manifest entry that was dropped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    /// The context URI or extension property name that was attempted.
    pub entry: String,
    /// Short error kind, see [`ResolveError::kind`].
    pub kind: String,
    /// Human-readable reason.
    pub reason: String,
}

impl SkippedEntry {
    /// Record a failed entry.
    pub fn new(entry: impl Into<String>, error: &ResolveError) -> Self {
        Self {
            entry: entry.into(),
            kind: error.kind().to_string(),
            reason: error.to_string(),
        }
    }
}

/// The set of validation structures derived from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationManifest {
    structures: Vec<ValidationStructure>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<SkippedEntry>,
}

impl ValidationManifest {
    /// An empty manifest ("nothing to validate").
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assemble a manifest from settled entries.
    pub fn new(structures: Vec<ValidationStructure>, skipped: Vec<SkippedEntry>) -> Self {
        Self {
            structures,
            skipped,
        }
    }

    /// Structures in report order.
    pub fn structures(&self) -> &[ValidationStructure] {
        &self.structures
    }

    /// Entries that were attempted but dropped.
    pub fn skipped(&self) -> &[SkippedEntry] {
        &self.skipped
    }

    /// Number of structures.
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// Whether there is nothing to validate.
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    /// Number of entries attempted: emitted plus skipped.
    pub fn attempted(&self) -> usize {
        self.structures.len() + self.skipped.len()
    }

    /// The structures as an order-free set.
    pub fn as_set(&self) -> BTreeSet<&ValidationStructure> {
        self.structures.iter().collect()
    }

    /// Iterate structures in report order.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationStructure> {
        self.structures.iter()
    }
}

impl<'a> IntoIterator for &'a ValidationManifest {
    type Item = &'a ValidationStructure;
    type IntoIter = std::slice::Iter<'a, ValidationStructure>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn structure(ptr: &str, schema: &str) -> ValidationStructure {
        ValidationStructure {
            pointer: JsonPointer::parse(ptr).unwrap(),
            context_ref: "http://ctx".into(),
            schema_ref: schema.into(),
        }
    }

    #[test]
    fn attempted_counts_structures_and_skips() {
        let skipped = SkippedEntry::new(
            "missing",
            &ResolveError::PropertyNotFound {
                property: "missing".into(),
            },
        );
        let manifest = ValidationManifest::new(vec![structure("", "s1")], vec![skipped]);
        assert_eq!(manifest.len(), 1);
        assert_eq!(manifest.attempted(), 2);
        assert_eq!(manifest.skipped()[0].kind, "property_not_found");
    }

    #[test]
    fn set_view_ignores_order() {
        let a = ValidationManifest::new(vec![structure("", "s1"), structure("/x", "s2")], vec![]);
        let b = ValidationManifest::new(vec![structure("/x", "s2"), structure("", "s1")], vec![]);
        assert_ne!(a, b);
        assert_eq!(a.as_set(), b.as_set());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let manifest = ValidationManifest::new(vec![structure("/someProp", "s")], vec![]);
        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            value,
            json!({
                "structures": [
                    {"pointer": "/someProp", "contextRef": "http://ctx", "schemaRef": "s"}
                ]
            })
        );
    }

    #[test]
    fn empty_manifest_has_nothing_to_validate() {
        let manifest = ValidationManifest::empty();
        assert!(manifest.is_empty());
        assert_eq!(manifest.attempted(), 0);
    }
}
