//! Context document → schema reference.

use std::fmt;
use std::sync::Arc;

use obi_core::ResolveError;
use obi_loader::DocumentLoader;

/// Property of a context document that names its schema.
pub const VALIDATION_KEY: &str = "validation";

/// Reads the `validation` schema reference out of context documents.
///
/// Every call performs exactly one load; nothing is cached between calls.
#[derive(Clone)]
pub struct ContextResolver {
    loader: Arc<dyn DocumentLoader>,
}

impl fmt::Debug for ContextResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextResolver").finish_non_exhaustive()
    }
}

impl ContextResolver {
    /// Create a resolver over the given loader.
    pub fn new(loader: Arc<dyn DocumentLoader>) -> Self {
        Self { loader }
    }

    /// Fetch `context_ref` and return its `validation` value verbatim.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::ContextLoad`] if the document cannot be loaded.
    /// - [`ResolveError::MalformedContext`] if it has no string
    ///   `validation` property.
    pub async fn resolve_schema(&self, context_ref: &str) -> Result<String, ResolveError> {
        tracing::debug!(context_ref, "loading context document");
        let remote = self
            .loader
            .load(context_ref)
            .await
            .map_err(|e| ResolveError::ContextLoad {
                context_ref: context_ref.to_string(),
                reason: e.to_string(),
            })?;

        remote
            .document
            .get(VALIDATION_KEY)
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| ResolveError::MalformedContext {
                context_ref: context_ref.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obi_loader::{StaticDocumentLoader, OBI_CONTEXT_URI};
    use serde_json::json;

    fn resolver(loader: StaticDocumentLoader) -> ContextResolver {
        ContextResolver::new(Arc::new(loader))
    }

    #[tokio::test]
    async fn builtin_context_names_assertion_schema() {
        let r = resolver(StaticDocumentLoader::builtin().unwrap());
        assert_eq!(
            r.resolve_schema(OBI_CONTEXT_URI).await.unwrap(),
            "http://openbadges.org/schema/1.1/assertion.json"
        );
    }

    #[tokio::test]
    async fn unknown_context_is_a_load_error() {
        let r = resolver(StaticDocumentLoader::new());
        let err = r.resolve_schema("http://nowhere.example/ctx").await.unwrap_err();
        assert_eq!(err.kind(), "context_load");
    }

    #[tokio::test]
    async fn non_string_validation_is_malformed() {
        let r = resolver(
            StaticDocumentLoader::new()
                .with_document("urn:a", json!({"validation": 7}))
                .with_document("urn:b", json!({"@context": {}})),
        );
        for uri in ["urn:a", "urn:b"] {
            let err = r.resolve_schema(uri).await.unwrap_err();
            assert_eq!(
                err,
                ResolveError::MalformedContext {
                    context_ref: uri.to_string()
                }
            );
        }
    }
}
