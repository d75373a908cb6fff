//! # obi-core: Foundational Types for the Badge Object Analyzer
//!
//! Defines the vocabulary shared by every other crate in the workspace:
//! where a sub-document lives inside a Badge Object, how its `@context`
//! declaration is shaped, and which schema governs it.
//!
//! ## Key Types
//!
//! - [`JsonPointer`]: RFC 6901 pointer into the Badge Object. The empty
//!   pointer addresses the whole document and is rendered as `root`.
//!
//! - [`ContextDeclaration`]: the parsed `@context` field: a single URI or
//!   an ordered list of URIs and extension mappings.
//!
//! - [`ValidationStructure`] / [`ValidationManifest`]: the output of
//!   manifest building. A structure always carries a resolved schema
//!   reference; unresolved entries are recorded as [`SkippedEntry`] instead.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `obi-*` crates (this is the leaf of the DAG).
//! - No I/O. Loading and validation live in `obi-loader` and `obi-schema`.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod error;
pub mod manifest;
pub mod pointer;

// Re-export primary types for ergonomic imports.
pub use context::{ContextDeclaration, ContextEntry, ExtensionDeclaration, CONTEXT_KEY};
pub use error::{AnalyzerError, ResolveError};
pub use manifest::{SkippedEntry, ValidationManifest, ValidationStructure};
pub use pointer::{InvalidPointer, JsonPointer};
