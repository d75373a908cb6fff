//! # obi-schema: Schema Store and Validation
//!
//! Supplies JSON Schemas by reference and validates badge sub-documents
//! against them.
//!
//! ## Components
//!
//! - [`SchemaStore`]: source of schema documents. [`LocalSchemaStore`]
//!   holds the built-in schemas and any operator-supplied directory;
//!   [`LayeredSchemaStore`] adds a document-loader fallback for references
//!   that are not local.
//! - [`SchemaValidator`]: compiles the referenced schema with `jsonschema`
//!   and reports each failure as a [`Violation`] carrying the field path,
//!   the failed keyword, the expected constraint and the actual value.
//!
//! ## Crate Policy
//!
//! - Validation returns a [`ValidationOutcome`], never an error.
//! - `$ref` resolution is confined to locally known schemas.

pub mod error;
pub mod store;
pub mod validate;

pub use error::SchemaError;
pub use store::{normalize_ref, LayeredSchemaStore, LocalSchemaStore, SchemaStore, BUILTIN_SCHEMAS};
pub use validate::{SchemaValidator, ValidationOutcome, Violation, SCHEMA_KEYWORD};
