//! In-memory document table.
//!
//! Serves the fixed set of built-in context URIs without network access,
//! and doubles as a test loader.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::document::{DocumentLoader, RemoteDocument};
use crate::error::LoaderError;

/// The canonical test base context.
pub const OBI_CONTEXT_URI: &str = "http://openbadges.org/context";

/// The companion test extension context.
pub const OBI_EXTENSION1_URI: &str = "http://openbadges.org/extension1";

/// Built-in context URIs and their embedded documents.
pub const BUILTIN_CONTEXTS: &[(&str, &str)] = &[
    (
        OBI_CONTEXT_URI,
        include_str!("../contexts/test-obi-context.json"),
    ),
    (
        OBI_EXTENSION1_URI,
        include_str!("../contexts/test-obi-extension.json"),
    ),
];

/// A loader backed by a fixed URI → document map.
#[derive(Debug, Clone, Default)]
pub struct StaticDocumentLoader {
    documents: HashMap<String, Value>,
}

impl StaticDocumentLoader {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of built-in contexts.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidJson`] if an embedded document does not
    /// parse.
    pub fn builtin() -> Result<Self, LoaderError> {
        let mut loader = Self::new();
        for (uri, raw) in BUILTIN_CONTEXTS {
            let document = serde_json::from_str(raw).map_err(|e| LoaderError::InvalidJson {
                uri: (*uri).to_string(),
                reason: e.to_string(),
            })?;
            loader.insert(*uri, document);
        }
        Ok(loader)
    }

    /// Add or replace a document.
    pub fn insert(&mut self, uri: impl Into<String>, document: Value) {
        self.documents.insert(uri.into(), document);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_document(mut self, uri: impl Into<String>, document: Value) -> Self {
        self.insert(uri, document);
        self
    }

    /// Whether `uri` is served by this table.
    pub fn contains(&self, uri: &str) -> bool {
        self.documents.contains_key(uri)
    }
}

#[async_trait]
impl DocumentLoader for StaticDocumentLoader {
    async fn load(&self, uri: &str) -> Result<RemoteDocument, LoaderError> {
        self.documents
            .get(uri)
            .map(|doc| RemoteDocument::new(doc.clone(), uri))
            .ok_or_else(|| LoaderError::NotFound {
                uri: uri.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_contexts_declare_validation_schemas() {
        let loader = StaticDocumentLoader::builtin().unwrap();
        assert_eq!(loader.documents.len(), BUILTIN_CONTEXTS.len());
        for (uri, _) in BUILTIN_CONTEXTS {
            assert!(loader.contains(uri));
            let doc = &loader.documents[*uri];
            assert!(
                doc["validation"].is_string(),
                "{uri} must declare a string validation property"
            );
        }
    }

    #[tokio::test]
    async fn load_returns_document_with_its_uri() {
        let loader = StaticDocumentLoader::new().with_document("urn:x", json!({"a": 1}));
        let doc = loader.load("urn:x").await.unwrap();
        assert_eq!(doc.document, json!({"a": 1}));
        assert_eq!(doc.document_url, "urn:x");
        assert!(doc.context_url.is_none());
    }

    #[tokio::test]
    async fn unknown_uri_is_not_found() {
        let loader = StaticDocumentLoader::new();
        let err = loader.load("urn:missing").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
