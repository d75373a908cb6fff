//! # Error Types: Structured Error Hierarchy
//!
//! Two layers of failure exist during analysis:
//!
//! - [`ResolveError`]: a single manifest entry could not be turned into a
//!   validation structure. Always recoverable: the entry is dropped and
//!   logged, the rest of the manifest is still built.
//! - [`AnalyzerError`]: the whole document cannot be analyzed. The only
//!   such condition today is an uninterpretable `@context`.
//!
//! Schema violations are deliberately absent from both enums. A document
//! that fails its schema is a normal outcome rendered into the report.

use thiserror::Error;

/// Failure to resolve one `@context` entry into a validation structure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The context document could not be fetched.
    #[error("could not load context document {context_ref}: {reason}")]
    ContextLoad {
        /// The context URI that was requested.
        context_ref: String,
        /// Loader-provided reason.
        reason: String,
    },

    /// The context document was fetched but has no string `validation` property.
    #[error("context document {context_ref} does not declare a string \"validation\" property")]
    MalformedContext {
        /// The context URI whose document was malformed.
        context_ref: String,
    },

    /// An extension property declared in `@context` is absent from every
    /// searched scope of the document.
    #[error("extension property \"{property}\" was not found in the document")]
    PropertyNotFound {
        /// The declared extension property name.
        property: String,
    },

    /// The extension property was found but carries no string `@context`
    /// of its own, so no schema can be derived for it.
    #[error("extension property \"{property}\" at {pointer} has no scoped @context string")]
    MissingLocalContext {
        /// The declared extension property name.
        property: String,
        /// Where the property was found.
        pointer: String,
    },
}

impl ResolveError {
    /// Short machine-friendly label used in structured logs and the
    /// manifest's skipped-entry list.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ContextLoad { .. } => "context_load",
            Self::MalformedContext { .. } => "malformed_context",
            Self::PropertyNotFound { .. } => "property_not_found",
            Self::MissingLocalContext { .. } => "missing_local_context",
        }
    }
}

/// Whole-document analysis failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerError {
    /// `@context` is absent, or is neither a string nor an array.
    #[error("@context must be a string or an array, found {found}")]
    InvalidContextDeclaration {
        /// JSON type name of what was found instead.
        found: &'static str,
    },
}
