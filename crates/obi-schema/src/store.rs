//! # Schema Store
//!
//! Supplies schema documents by reference. Context documents declare
//! schemas by URI; those URIs usually point into a local schema directory
//! rather than at a live server.
//!
//! ## Lookup Order
//!
//! [`LocalSchemaStore`] tries the reference as given, then with any
//! trailing `#` stripped, then by file name. [`LayeredSchemaStore`] falls
//! back to the document loader for references the local store does not
//! know.
//!
//! Cross-schema `$ref`s are resolved against the locally known schemas
//! only (see [`SchemaStore::resources`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use obi_loader::DocumentLoader;
use serde_json::Value;

use crate::error::SchemaError;

/// Schemas that ship with the analyzer, matching the built-in contexts.
pub const BUILTIN_SCHEMAS: &[(&str, &str)] = &[
    (
        "obi-assertion.schema.json",
        include_str!("../schemas/obi-assertion.schema.json"),
    ),
    (
        "obi-extension1.schema.json",
        include_str!("../schemas/obi-extension1.schema.json"),
    ),
];

/// Source of schema documents for the validator.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Obtain the schema identified by `schema_ref`.
    async fn fetch(&self, schema_ref: &str) -> Result<Value, SchemaError>;

    /// All locally known schemas keyed by URI, used to resolve `$ref`s
    /// while compiling a validator.
    fn resources(&self) -> HashMap<String, Value>;
}

/// Strip a trailing empty fragment so `http://x/s.json#` and
/// `http://x/s.json` name the same schema.
pub fn normalize_ref(schema_ref: &str) -> &str {
    schema_ref.strip_suffix('#').unwrap_or(schema_ref)
}

fn file_name_of(schema_ref: &str) -> &str {
    let path = normalize_ref(schema_ref);
    let path = path.split('#').next().unwrap_or(path);
    path.rsplit('/').next().unwrap_or(path)
}

// ---------------------------------------------------------------------------
// LocalSchemaStore
// ---------------------------------------------------------------------------

/// In-memory schema registry, populated from built-ins and/or a directory.
#[derive(Clone, Default)]
pub struct LocalSchemaStore {
    /// Schemas indexed by normalized `$id` URI.
    schema_map: HashMap<String, Value>,
    /// Map from schema filename to its `$id` URI.
    filename_to_id: HashMap<String, String>,
}

impl std::fmt::Debug for LocalSchemaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSchemaStore")
            .field("schema_count", &self.schema_map.len())
            .finish()
    }
}

impl LocalSchemaStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding the built-in schemas.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaLoadError`] if an embedded schema does
    /// not parse.
    pub fn builtin() -> Result<Self, SchemaError> {
        let mut store = Self::new();
        for (filename, raw) in BUILTIN_SCHEMAS {
            let schema: Value =
                serde_json::from_str(raw).map_err(|e| SchemaError::SchemaLoadError {
                    path: (*filename).to_string(),
                    reason: e.to_string(),
                })?;
            store.register(filename, schema);
        }
        Ok(store)
    }

    /// Add every `*.json` file under `schema_dir` (recursively). Schemas
    /// loaded later replace earlier ones with the same `$id`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaLoadError`] if the directory or any
    /// schema file cannot be read or parsed.
    pub fn with_dir(mut self, schema_dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let schema_dir = schema_dir.as_ref();
        if !schema_dir.is_dir() {
            return Err(SchemaError::SchemaLoadError {
                path: schema_dir.display().to_string(),
                reason: "not a directory".to_string(),
            });
        }

        let mut paths = Vec::new();
        walk_for_schemas(schema_dir, &mut paths)?;
        paths.sort();

        for path in paths {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                SchemaError::SchemaLoadError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            let schema: Value = serde_json::from_str(&content).map_err(|e| {
                SchemaError::SchemaLoadError {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            if let Some(filename) = path.file_name().and_then(|f| f.to_str()) {
                self.register(filename, schema);
            }
        }

        tracing::debug!(
            dir = %schema_dir.display(),
            schema_count = self.schema_map.len(),
            "loaded schema directory"
        );
        Ok(self)
    }

    /// Register a schema under its `$id` (or its file name when it has none).
    pub fn register(&mut self, filename: &str, schema: Value) {
        let schema_id = schema
            .get("$id")
            .or_else(|| schema.get("id"))
            .and_then(Value::as_str)
            .map(|id| normalize_ref(id).to_string())
            .unwrap_or_else(|| filename.to_string());
        self.filename_to_id
            .insert(filename.to_string(), schema_id.clone());
        self.schema_map.insert(schema_id, schema);
    }

    /// Number of schemas loaded.
    pub fn schema_count(&self) -> usize {
        self.schema_map.len()
    }

    /// Look up a schema by reference: exact id, then file name.
    pub fn get(&self, schema_ref: &str) -> Option<&Value> {
        self.schema_map
            .get(normalize_ref(schema_ref))
            .or_else(|| {
                self.filename_to_id
                    .get(file_name_of(schema_ref))
                    .and_then(|id| self.schema_map.get(id))
            })
    }
}

#[async_trait]
impl SchemaStore for LocalSchemaStore {
    async fn fetch(&self, schema_ref: &str) -> Result<Value, SchemaError> {
        self.get(schema_ref)
            .cloned()
            .ok_or_else(|| SchemaError::SchemaNotFound(schema_ref.to_string()))
    }

    fn resources(&self) -> HashMap<String, Value> {
        self.schema_map.clone()
    }
}

fn walk_for_schemas(dir: &Path, acc: &mut Vec<PathBuf>) -> Result<(), SchemaError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            walk_for_schemas(&path, acc)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("json") {
            acc.push(path);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// LayeredSchemaStore
// ---------------------------------------------------------------------------

/// Local schemas first, then the document loader for anything else.
#[derive(Clone)]
pub struct LayeredSchemaStore {
    local: LocalSchemaStore,
    loader: Arc<dyn DocumentLoader>,
}

impl std::fmt::Debug for LayeredSchemaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredSchemaStore")
            .field("local", &self.local)
            .finish_non_exhaustive()
    }
}

impl LayeredSchemaStore {
    /// Combine a local store with a loader fallback.
    pub fn new(local: LocalSchemaStore, loader: Arc<dyn DocumentLoader>) -> Self {
        Self { local, loader }
    }
}

#[async_trait]
impl SchemaStore for LayeredSchemaStore {
    async fn fetch(&self, schema_ref: &str) -> Result<Value, SchemaError> {
        if let Some(schema) = self.local.get(schema_ref) {
            return Ok(schema.clone());
        }
        tracing::debug!(schema_ref, "schema not local, fetching through loader");
        self.loader
            .load(schema_ref)
            .await
            .map(|doc| doc.document)
            .map_err(|e| {
                if e.is_not_found() {
                    SchemaError::SchemaNotFound(schema_ref.to_string())
                } else {
                    SchemaError::FetchError {
                        schema_ref: schema_ref.to_string(),
                        reason: e.to_string(),
                    }
                }
            })
    }

    fn resources(&self) -> HashMap<String, Value> {
        self.local.resources()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obi_loader::StaticDocumentLoader;
    use serde_json::json;

    const ASSERTION_ID: &str = "http://openbadges.org/schema/1.1/assertion.json";

    #[test]
    fn test_builtin_schemas_are_registered_by_id() {
        let store = LocalSchemaStore::builtin().unwrap();
        assert_eq!(store.schema_count(), BUILTIN_SCHEMAS.len());
        assert!(store.schema_map.contains_key(ASSERTION_ID));
    }

    #[test]
    fn test_lookup_tolerates_trailing_fragment_and_filename() {
        let store = LocalSchemaStore::builtin().unwrap();
        assert!(store.get(ASSERTION_ID).is_some());
        assert!(store.get(&format!("{ASSERTION_ID}#")).is_some());
        assert!(store
            .get("http://elsewhere.example/obi-assertion.schema.json")
            .is_some());
        assert!(store.get("http://openbadges.org/schema/none.json").is_none());
    }

    #[test]
    fn test_with_dir_scans_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("a.json"),
            r#"{"$id": "http://schemas.example/a.json#", "type": "object"}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("nested/b.schema.json"),
            r#"{"type": "string"}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = LocalSchemaStore::new().with_dir(dir.path()).unwrap();
        assert_eq!(store.schema_count(), 2);
        assert!(store.get("http://schemas.example/a.json").is_some());
        assert_eq!(store.get("b.schema.json"), Some(&json!({"type": "string"})));
    }

    #[test]
    fn test_with_dir_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{ nope").unwrap();
        let err = LocalSchemaStore::new().with_dir(dir.path()).unwrap_err();
        assert!(matches!(err, SchemaError::SchemaLoadError { .. }));
    }

    #[test]
    fn test_with_missing_dir_is_an_error() {
        let err = LocalSchemaStore::new().with_dir("/definitely/not/here").unwrap_err();
        assert!(matches!(err, SchemaError::SchemaLoadError { .. }));
    }

    #[tokio::test]
    async fn test_layered_store_falls_back_to_loader() {
        let loader = StaticDocumentLoader::new()
            .with_document("http://remote.example/s.json", json!({"type": "integer"}));
        let store = LayeredSchemaStore::new(LocalSchemaStore::builtin().unwrap(), Arc::new(loader));

        assert_eq!(
            store.fetch("http://remote.example/s.json").await.unwrap(),
            json!({"type": "integer"})
        );
        assert!(store.fetch(ASSERTION_ID).await.is_ok());

        let err = store.fetch("http://remote.example/missing.json").await.unwrap_err();
        assert!(matches!(err, SchemaError::SchemaNotFound(_)));
    }
}
