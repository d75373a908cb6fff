//! Analyzer construction errors.
//!
//! Per-entry and whole-document analysis failures live in
//! [`obi_core::error`]; this module only covers wiring an analyzer up from
//! configuration.

use obi_loader::LoaderError;
use obi_schema::SchemaError;
use thiserror::Error;

/// Failure to build a [`BadgeAnalyzer`](crate::BadgeAnalyzer) from config.
#[derive(Error, Debug)]
pub enum SetupError {
    /// The document loader could not be constructed.
    #[error("document loader setup failed: {0}")]
    Loader(#[from] LoaderError),

    /// The schema store could not be populated.
    #[error("schema store setup failed: {0}")]
    Schema(#[from] SchemaError),
}
