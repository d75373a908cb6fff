//! # JSON Pointer
//!
//! A validated RFC 6901 pointer into a Badge Object. Segments are escaped
//! on construction (`~` → `~0`, `/` → `~1`), so a pointer built from
//! property names always resolves back to the property it names.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Label used for the empty pointer in human-readable output.
const ROOT_LABEL: &str = "root";

/// An RFC 6901 JSON Pointer. The empty pointer addresses the whole document.
///
/// Serialized as its escaped string. Deserialization goes through
/// [`JsonPointer::parse`], so relative pointers are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct JsonPointer(String);

/// A string that is neither empty nor starts with `/`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("JSON pointer must be empty or start with '/', found {0:?}")]
pub struct InvalidPointer(pub String);

impl JsonPointer {
    /// The pointer to the whole document.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Build a pointer from unescaped property-name segments.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        segments
            .into_iter()
            .fold(Self::root(), |ptr, seg| ptr.child(seg.as_ref()))
    }

    /// Parse an already-escaped pointer string. Returns `None` unless the
    /// string is empty or starts with `/`.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.starts_with('/') {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    /// Append one unescaped segment.
    pub fn child(&self, segment: &str) -> Self {
        let escaped = segment.replace('~', "~0").replace('/', "~1");
        Self(format!("{}/{escaped}", self.0))
    }

    /// Whether this pointer addresses the whole document.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The escaped pointer string (empty for the root).
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable label: `root` for the empty pointer, else the pointer.
    pub fn label(&self) -> &str {
        if self.is_root() {
            ROOT_LABEL
        } else {
            &self.0
        }
    }

    /// Resolve the pointer against a document.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        document.pointer(&self.0)
    }
}

impl TryFrom<String> for JsonPointer {
    type Error = InvalidPointer;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw).ok_or(InvalidPointer(raw))
    }
}

impl From<JsonPointer> for String {
    fn from(pointer: JsonPointer) -> Self {
        pointer.0
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
