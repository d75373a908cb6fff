//! # Structure Locator
//!
//! Finds where a declared extension property lives in a Badge Object.
//!
//! Extensions may attach to the assertion itself, to its embedded badge
//! class, or to the badge class's embedded issuer. The locator tries an
//! ordered list of scopes (sub-object paths) and takes the first scope
//! whose object has the property as a direct key. A scope whose path does
//! not lead to an object (`badge` is a URL string, `issuer` is absent) is
//! simply not a match.

use obi_core::{JsonPointer, ResolveError, CONTEXT_KEY};
use serde_json::Value;

use crate::config::default_scopes;

/// Where a property was found and the context it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedProperty {
    /// Pointer to the property's value.
    pub pointer: JsonPointer,
    /// The value's own `@context`, when that is a string.
    pub local_context: Option<String>,
}

/// Searches configured scopes for a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureLocator {
    scopes: Vec<Vec<String>>,
}

impl Default for StructureLocator {
    fn default() -> Self {
        Self::new(default_scopes())
    }
}

impl StructureLocator {
    /// A locator searching `scopes` in order.
    pub fn new(scopes: Vec<Vec<String>>) -> Self {
        Self { scopes }
    }

    /// The scopes searched, in order.
    pub fn scopes(&self) -> &[Vec<String>] {
        &self.scopes
    }

    /// Find `property` in the first scope that has it.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::PropertyNotFound`] if no scope has it.
    pub fn locate(&self, document: &Value, property: &str) -> Result<LocatedProperty, ResolveError> {
        for scope in &self.scopes {
            let Some(container) = descend(document, scope) else {
                continue;
            };
            let Some(value) = container.as_object().and_then(|obj| obj.get(property)) else {
                continue;
            };
            let pointer = JsonPointer::from_segments(
                scope.iter().map(String::as_str).chain(std::iter::once(property)),
            );
            let local_context = value
                .get(CONTEXT_KEY)
                .and_then(Value::as_str)
                .map(str::to_string);
            return Ok(LocatedProperty {
                pointer,
                local_context,
            });
        }
        Err(ResolveError::PropertyNotFound {
            property: property.to_string(),
        })
    }
}

fn descend<'a>(document: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter()
        .try_fold(document, |current, key| current.as_object()?.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_property() {
        let doc = json!({"someProp": {"@context": "urn:ext", "value": 1}});
        let found = StructureLocator::default().locate(&doc, "someProp").unwrap();
        assert_eq!(found.pointer.as_str(), "/someProp");
        assert_eq!(found.local_context.as_deref(), Some("urn:ext"));
    }

    #[test]
    fn badge_and_issuer_scopes() {
        let doc = json!({
            "badge": {
                "inBadge": {"@context": "urn:b"},
                "issuer": {"inIssuer": {"@context": "urn:i"}}
            }
        });
        let locator = StructureLocator::default();
        assert_eq!(locator.locate(&doc, "inBadge").unwrap().pointer.as_str(), "/badge/inBadge");
        assert_eq!(
            locator.locate(&doc, "inIssuer").unwrap().pointer.as_str(),
            "/badge/issuer/inIssuer"
        );
    }

    #[test]
    fn earlier_scope_wins() {
        let doc = json!({"p": {"@context": "urn:top"}, "badge": {"p": {"@context": "urn:badge"}}});
        let found = StructureLocator::default().locate(&doc, "p").unwrap();
        assert_eq!(found.pointer.as_str(), "/p");
        assert_eq!(found.local_context.as_deref(), Some("urn:top"));
    }

    #[test]
    fn string_badge_is_no_match_not_a_crash() {
        let doc = json!({"badge": "https://example.org/badge.json"});
        let err = StructureLocator::default().locate(&doc, "issuerExt").unwrap_err();
        assert_eq!(
            err,
            ResolveError::PropertyNotFound {
                property: "issuerExt".to_string()
            }
        );
    }

    #[test]
    fn non_string_local_context_is_none() {
        let doc = json!({"ext": {"@context": ["urn:a"]}, "plain": 5});
        let locator = StructureLocator::default();
        assert_eq!(locator.locate(&doc, "ext").unwrap().local_context, None);
        assert_eq!(locator.locate(&doc, "plain").unwrap().local_context, None);
    }

    #[test]
    fn property_names_are_pointer_escaped() {
        let doc = json!({"a/b": {"@context": "urn:x"}});
        let found = StructureLocator::default().locate(&doc, "a/b").unwrap();
        assert_eq!(found.pointer.as_str(), "/a~1b");
        assert!(found.pointer.resolve(&doc).is_some());
    }

    #[test]
    fn custom_scopes() {
        let doc = json!({"extensions": {"ext": {"@context": "urn:x"}}, "ext": {}});
        let locator = StructureLocator::new(vec![vec!["extensions".to_string()]]);
        assert_eq!(locator.locate(&doc, "ext").unwrap().pointer.as_str(), "/extensions/ext");
    }
}
