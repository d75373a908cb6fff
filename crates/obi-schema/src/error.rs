//! Schema store error types.

use thiserror::Error;

/// Errors raised while obtaining or compiling a schema.
///
/// A document failing its schema is not represented here; see
/// [`ValidationOutcome`](crate::ValidationOutcome).
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A schema file could not be read or parsed.
    #[error("failed to load schema {path}: {reason}")]
    SchemaLoadError {
        /// Path or identifier of the schema that failed to load.
        path: String,
        /// Human-readable reason for the failure.
        reason: String,
    },

    /// The schema reference is neither known locally nor fetchable.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// Fetching a non-local schema through the document loader failed.
    #[error("failed to fetch schema {schema_ref}: {reason}")]
    FetchError {
        /// The schema reference that was requested.
        schema_ref: String,
        /// Loader-provided reason.
        reason: String,
    },

    /// The schema could not be compiled into a validator.
    #[error("failed to compile schema {schema_ref}: {reason}")]
    SchemaCompileError {
        /// The schema reference.
        schema_ref: String,
        /// Human-readable reason.
        reason: String,
    },

    /// I/O error while scanning a schema directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
