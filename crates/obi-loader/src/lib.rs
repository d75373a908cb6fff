//! # obi-loader: JSON-LD Document Loading
//!
//! Resolves context (and schema) URIs to JSON documents for the analyzer.
//!
//! ## Resolution Order
//!
//! [`TieredDocumentLoader`] consults, in order:
//!
//! 1. operator overrides from [`LoaderConfig::overrides`] (URI → local file);
//! 2. the built-in context table ([`BUILTIN_CONTEXTS`]), served from memory;
//! 3. [`HttpDocumentLoader`] for `http`, `https` and `file` URIs.
//!
//! The built-in URIs never touch the network, so the test contexts work
//! offline.
//!
//! ## Crate Policy
//!
//! - Loaders are injected as `Arc<dyn DocumentLoader>`; nothing in the
//!   workspace holds a global loader.
//! - Remote fetches are always bounded by a timeout.

pub mod config;
pub mod document;
pub mod error;
pub mod http;
pub mod static_loader;

pub use config::{ConfigError, LoaderConfig};
pub use document::{DocumentLoader, RemoteDocument};
pub use error::LoaderError;
pub use http::HttpDocumentLoader;
pub use static_loader::{
    StaticDocumentLoader, BUILTIN_CONTEXTS, OBI_CONTEXT_URI, OBI_EXTENSION1_URI,
};

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

/// The default loader: overrides, then built-ins, then HTTP/file.
#[derive(Debug, Clone)]
pub struct TieredDocumentLoader {
    overrides: BTreeMap<String, PathBuf>,
    builtin: StaticDocumentLoader,
    remote: HttpDocumentLoader,
}

impl TieredDocumentLoader {
    /// Create the loader from configuration.
    pub fn new(config: &LoaderConfig) -> Result<Self, LoaderError> {
        Ok(Self {
            overrides: config.overrides.clone(),
            builtin: StaticDocumentLoader::builtin()?,
            remote: HttpDocumentLoader::new(config)?,
        })
    }
}

#[async_trait]
impl DocumentLoader for TieredDocumentLoader {
    async fn load(&self, uri: &str) -> Result<RemoteDocument, LoaderError> {
        if let Some(path) = self.overrides.get(uri) {
            tracing::debug!(uri, path = %path.display(), "loading overridden document");
            let document = http::read_json_file(path).await?;
            return Ok(RemoteDocument::new(document, uri));
        }
        if self.builtin.contains(uri) {
            tracing::debug!(uri, "loading built-in document");
            return self.builtin.load(uri).await;
        }
        self.remote.load(uri).await
    }
}
