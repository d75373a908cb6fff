//! # `@context` Declarations
//!
//! A Badge Object declares its vocabularies through `@context`, in one of
//! two shapes:
//!
//! - a single URI string, for un-extended badges;
//! - an array mixing URI strings (base or additional whole-document
//!   contexts) with objects mapping an extended property name to the
//!   extension's namespace URI.
//!
//! The namespace URI of an extension mapping is only a shape signal. The
//! schema for an extension comes from the `@context` embedded in the
//! extended sub-object itself.

use serde_json::Value;

use crate::error::AnalyzerError;

/// The JSON-LD context key.
pub const CONTEXT_KEY: &str = "@context";

/// A parsed `@context` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextDeclaration {
    /// A single context URI governing the whole document.
    Single(String),
    /// An ordered list of context entries.
    Mixed(Vec<ContextEntry>),
}

/// One item of an array-valued `@context`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextEntry {
    /// A bare URI applying to the whole document.
    Uri(String),
    /// A mapping object declaring extension properties, in key order.
    Extensions(Vec<ExtensionDeclaration>),
    /// Anything else (numbers, nested arrays, null). Kept so the caller
    /// can report it; contributes nothing to the manifest.
    Unsupported(&'static str),
}

/// A single `"propertyName": "namespace URI"` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDeclaration {
    /// The extended property's name.
    pub property: String,
    /// The declared namespace URI. Not used for schema resolution.
    pub namespace: String,
}

impl ContextDeclaration {
    /// Read the `@context` declaration from a Badge Object.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::InvalidContextDeclaration`] when `@context`
    /// is missing or is neither a string nor an array.
    pub fn from_document(document: &Value) -> Result<Self, AnalyzerError> {
        match document.get(CONTEXT_KEY) {
            Some(value) => Self::from_value(value),
            None => Err(AnalyzerError::InvalidContextDeclaration { found: "nothing" }),
        }
    }

    /// Interpret a raw `@context` value.
    ///
    /// Mapping values that are not strings are dropped from the extension
    /// list; they cannot name an extension namespace.
    pub fn from_value(value: &Value) -> Result<Self, AnalyzerError> {
        match value {
            Value::String(uri) => Ok(Self::Single(uri.clone())),
            Value::Array(items) => Ok(Self::Mixed(items.iter().map(ContextEntry::from_value).collect())),
            other => Err(AnalyzerError::InvalidContextDeclaration {
                found: json_type_name(other),
            }),
        }
    }
}

impl ContextEntry {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(uri) => Self::Uri(uri.clone()),
            Value::Object(map) => Self::Extensions(
                map.iter()
                    .filter_map(|(property, ns)| {
                        ns.as_str().map(|ns| ExtensionDeclaration {
                            property: property.clone(),
                            namespace: ns.to_string(),
                        })
                    })
                    .collect(),
            ),
            other => Self::Unsupported(json_type_name(other)),
        }
    }
}

/// JSON type name for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_string_context() {
        let doc = json!({"@context": "http://openbadges.org/context"});
        let decl = ContextDeclaration::from_document(&doc).unwrap();
        assert_eq!(
            decl,
            ContextDeclaration::Single("http://openbadges.org/context".into())
        );
    }

    #[test]
    fn mixed_array_context() {
        let doc = json!({
            "@context": [
                "http://openbadges.org/context",
                {"someProp": "http://openbadges.org/extension1", "other": "http://x.org/e"},
                "http://example.org/second"
            ]
        });
        let ContextDeclaration::Mixed(entries) = ContextDeclaration::from_document(&doc).unwrap()
        else {
            panic!("array @context must parse as Mixed");
        };
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], ContextEntry::Uri("http://openbadges.org/context".into()));
        assert_eq!(entries[2], ContextEntry::Uri("http://example.org/second".into()));
        let ContextEntry::Extensions(exts) = &entries[1] else {
            panic!("mapping entry must parse as Extensions");
        };
        let props: Vec<&str> = exts.iter().map(|e| e.property.as_str()).collect();
        assert_eq!(props, ["other", "someProp"]);
    }

    #[test]
    fn non_string_mapping_values_are_not_extensions() {
        let value = json!([{"someProp": {"@id": "x"}, "ok": "http://x.org"}]);
        let decl = ContextDeclaration::from_value(&value).unwrap();
        assert_eq!(
            decl,
            ContextDeclaration::Mixed(vec![ContextEntry::Extensions(vec![ExtensionDeclaration {
                property: "ok".into(),
                namespace: "http://x.org".into(),
            }])])
        );
    }

    #[test]
    fn unsupported_array_items_are_preserved() {
        let value = json!(["http://a", 42, null]);
        let decl = ContextDeclaration::from_value(&value).unwrap();
        assert_eq!(
            decl,
            ContextDeclaration::Mixed(vec![
                ContextEntry::Uri("http://a".into()),
                ContextEntry::Unsupported("number"),
                ContextEntry::Unsupported("null"),
            ])
        );
    }

    #[test]
    fn missing_context_is_rejected() {
        let err = ContextDeclaration::from_document(&json!({"uid": "1"})).unwrap_err();
        assert_eq!(err, AnalyzerError::InvalidContextDeclaration { found: "nothing" });
    }

    #[test]
    fn object_context_is_rejected() {
        let err = ContextDeclaration::from_document(&json!({"@context": {"a": "b"}})).unwrap_err();
        assert_eq!(err, AnalyzerError::InvalidContextDeclaration { found: "object" });
    }
}
