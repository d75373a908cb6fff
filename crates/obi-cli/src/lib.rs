//! # obi-cli: Badge Object Analyzer CLI
//!
//! Provides the `obi` command-line interface.
//!
//! ## Subcommands
//!
//! - `obi analyze`: validate a badge document against the schemas its
//!   `@context` declares and print the report.
//! - `obi manifest`: print the derived validation manifest as JSON.
//!
//! ```bash
//! obi analyze assertion.json
//! obi analyze --offline --context http://example.org/ctx=./ctx.json badge.yaml
//! cat assertion.json | obi manifest -
//! ```
//!
//! The report goes to stdout; logs go to stderr.

pub mod analyze;
pub mod input;
pub mod manifest;
pub mod render;

/// Every structure passed.
pub const EXIT_OK: u8 = 0;

/// Some structure has violations, or there was nothing to validate.
pub const EXIT_FAILED: u8 = 1;

/// The document could not be read or its `@context` interpreted.
pub const EXIT_OPERATIONAL: u8 = 2;
