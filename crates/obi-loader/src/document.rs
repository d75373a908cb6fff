//! The loaded-document envelope and the loader trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LoaderError;

/// A JSON-LD document as returned by a loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    /// Context URL advertised via an HTTP `Link` header, if any.
    #[serde(default)]
    pub context_url: Option<String>,
    /// The parsed document.
    pub document: Value,
    /// The URL the document was actually read from, after redirects.
    pub document_url: String,
}

impl RemoteDocument {
    /// A document read from `url` with no linked context.
    pub fn new(document: Value, document_url: impl Into<String>) -> Self {
        Self {
            context_url: None,
            document,
            document_url: document_url.into(),
        }
    }
}

/// Resolves a URI to a JSON-LD document.
///
/// Implementations must be safe to call concurrently; the analyzer issues
/// overlapping loads for every `@context` entry of a document.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Fetch and parse the document at `uri`.
    async fn load(&self, uri: &str) -> Result<RemoteDocument, LoaderError>;
}

#[async_trait]
impl<T: DocumentLoader + ?Sized> DocumentLoader for std::sync::Arc<T> {
    async fn load(&self, uri: &str) -> Result<RemoteDocument, LoaderError> {
        (**self).load(uri).await
    }
}
