//! # Schema Validation
//!
//! Validates a sub-document against the schema named by a validation
//! structure and turns raw `jsonschema` errors into [`Violation`]s that
//! name the offending field, the constraint it broke, and the value found.
//!
//! ## Outcome, not error
//!
//! [`SchemaValidator::validate`] never fails. A document that violates its
//! schema yields a non-empty [`ValidationOutcome`]. A schema that cannot be
//! fetched or compiled yields a single root-level violation with the
//! keyword `schema`, so the report still shows a section for it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use jsonschema::error::ValidationErrorKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;
use crate::store::{normalize_ref, SchemaStore};

/// Longest rendering of an actual value before it is truncated.
const MAX_ACTUAL_LEN: usize = 80;

/// Keyword used for violations that come from schema loading, not from
/// the document.
pub const SCHEMA_KEYWORD: &str = "schema";

// ---------------------------------------------------------------------------
// Violations
// ---------------------------------------------------------------------------

/// A single normalized schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    /// JSON Pointer to the violating field, relative to the validated
    /// sub-document.
    pub instance_path: String,
    /// JSON Pointer within the schema that triggered the error.
    pub schema_path: String,
    /// The schema keyword that failed (`required`, `type`, ...).
    pub keyword: String,
    /// Description of the constraint that was expected to hold.
    pub expected: String,
    /// Compact rendering of the offending value, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// The validator's own message.
    pub message: String,
}

impl Violation {
    /// A violation describing a schema that could not be used.
    pub fn schema_unavailable(error: &SchemaError) -> Self {
        Self {
            instance_path: String::new(),
            schema_path: String::new(),
            keyword: SCHEMA_KEYWORD.to_string(),
            expected: "schema must be loadable and compile".to_string(),
            actual: None,
            message: error.to_string(),
        }
    }

    /// Normalize a raw validator error.
    ///
    /// `schema` is the root schema the error was produced from and
    /// `resources` the schemas its `$ref`s may point into; both are used to
    /// quote the failing constraint.
    pub fn from_validation_error(
        error: &jsonschema::ValidationError<'_>,
        schema: &Value,
        resources: &HashMap<String, Value>,
    ) -> Self {
        let instance_path = error.instance_path.to_string();
        let schema_path = error.schema_path.to_string();
        let keyword = keyword_of(&error.kind);

        let mut expected = describe_keyword(keyword);
        let ends_in_keyword = schema_path.rsplit('/').next() == Some(keyword);
        if ends_in_keyword {
            if let Some(constraint) = constraint_at(schema, &schema_path, resources) {
                if is_quotable(constraint) {
                    expected = format!("{expected} ({keyword}: {})", truncate(&constraint.to_string()));
                }
            }
        }

        let instance: &Value = &error.instance;
        Self {
            instance_path,
            schema_path,
            keyword: keyword.to_string(),
            expected,
            actual: Some(truncate(&instance.to_string())),
            message: error.to_string(),
        }
    }
}

/// The schema keyword behind a validator error.
fn keyword_of(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::AdditionalItems { .. } => "additionalItems",
        ValidationErrorKind::AdditionalProperties { .. } => "additionalProperties",
        ValidationErrorKind::AnyOf => "anyOf",
        ValidationErrorKind::BacktrackLimitExceeded { .. } => "pattern",
        ValidationErrorKind::Constant { .. } => "const",
        ValidationErrorKind::Contains => "contains",
        ValidationErrorKind::ContentEncoding { .. } => "contentEncoding",
        ValidationErrorKind::ContentMediaType { .. } => "contentMediaType",
        ValidationErrorKind::Custom { .. } => "custom",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::ExclusiveMaximum { .. } => "exclusiveMaximum",
        ValidationErrorKind::ExclusiveMinimum { .. } => "exclusiveMinimum",
        ValidationErrorKind::FalseSchema => "false",
        ValidationErrorKind::Format { .. } => "format",
        ValidationErrorKind::FromUtf8 { .. } => "contentEncoding",
        ValidationErrorKind::MaxItems { .. } => "maxItems",
        ValidationErrorKind::Maximum { .. } => "maximum",
        ValidationErrorKind::MaxLength { .. } => "maxLength",
        ValidationErrorKind::MaxProperties { .. } => "maxProperties",
        ValidationErrorKind::MinItems { .. } => "minItems",
        ValidationErrorKind::Minimum { .. } => "minimum",
        ValidationErrorKind::MinLength { .. } => "minLength",
        ValidationErrorKind::MinProperties { .. } => "minProperties",
        ValidationErrorKind::MultipleOf { .. } => "multipleOf",
        ValidationErrorKind::Not { .. } => "not",
        ValidationErrorKind::OneOfMultipleValid | ValidationErrorKind::OneOfNotValid => "oneOf",
        ValidationErrorKind::Pattern { .. } => "pattern",
        ValidationErrorKind::PropertyNames { .. } => "propertyNames",
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::Type { .. } => "type",
        ValidationErrorKind::UnevaluatedItems { .. } => "unevaluatedItems",
        ValidationErrorKind::UnevaluatedProperties { .. } => "unevaluatedProperties",
        ValidationErrorKind::UniqueItems => "uniqueItems",
        ValidationErrorKind::Referencing(_) => "$ref",
    }
}

/// Scalars and arrays of scalars; subschemas are not worth quoting.
fn is_quotable(constraint: &Value) -> bool {
    match constraint {
        Value::Object(_) => false,
        Value::Array(items) => !items.iter().any(Value::is_object),
        _ => true,
    }
}

/// Walk `schema_path` from `root`, following `$ref` segments into the
/// referenced schema (same document or another known resource).
fn constraint_at<'a>(
    root: &'a Value,
    schema_path: &str,
    resources: &'a HashMap<String, Value>,
) -> Option<&'a Value> {
    let mut document = root;
    let mut node = root;
    for raw in schema_path.split('/').skip(1) {
        let segment = raw.replace("~1", "/").replace("~0", "~");
        if segment == "$ref" {
            if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
                (document, node) = follow_ref(document, reference, resources)?;
                continue;
            }
        }
        node = match node {
            Value::Object(map) => map.get(&segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Resolve a `$ref` to (containing document, target subschema).
fn follow_ref<'a>(
    document: &'a Value,
    reference: &str,
    resources: &'a HashMap<String, Value>,
) -> Option<(&'a Value, &'a Value)> {
    let (base, fragment) = reference.split_once('#').unwrap_or((reference, ""));
    let target_document = if base.is_empty() {
        document
    } else {
        lookup_resource(resources, base)?
    };
    let target = if fragment.is_empty() {
        target_document
    } else {
        target_document.pointer(fragment)?
    };
    Some((target_document, target))
}

/// Exact id first, then the lexically first id with the same file name
/// (relative references).
fn lookup_resource<'a>(resources: &'a HashMap<String, Value>, base: &str) -> Option<&'a Value> {
    resources.get(normalize_ref(base)).or_else(|| {
        let file = base.rsplit('/').next()?;
        resources
            .iter()
            .filter(|(id, _)| id.rsplit('/').next() == Some(file))
            .min_by_key(|(id, _)| id.as_str())
            .map(|(_, schema)| schema)
    })
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.instance_path.is_empty() {
            "(root)"
        } else {
            self.instance_path.as_str()
        };
        write!(f, "{path}: {} [expected: {}", self.message, self.expected)?;
        if let Some(actual) = &self.actual {
            write!(f, "; actual: {actual}")?;
        }
        write!(f, "]")
    }
}

/// Human description of a JSON Schema keyword.
fn describe_keyword(keyword: &str) -> String {
    let text = match keyword {
        "required" => "required properties must be present",
        "type" => "value must have the declared type",
        "enum" => "value must be one of the allowed options",
        "const" => "value must equal the declared constant",
        "pattern" => "string must match the declared pattern",
        "format" => "string must match the declared format",
        "minLength" | "maxLength" => "string length must be within bounds",
        "minimum" | "maximum" | "exclusiveMinimum" | "exclusiveMaximum" => {
            "number must be within bounds"
        }
        "multipleOf" => "number must be a multiple of the declared factor",
        "minItems" | "maxItems" => "array length must be within bounds",
        "uniqueItems" => "array items must be unique",
        "contains" => "array must contain a matching item",
        "minProperties" | "maxProperties" => "object size must be within bounds",
        "additionalProperties" => "no properties beyond those declared",
        "additionalItems" => "no items beyond those declared",
        "propertyNames" => "property names must match the declared schema",
        "unevaluatedProperties" => "no properties beyond those evaluated",
        "unevaluatedItems" => "no items beyond those evaluated",
        "contentEncoding" | "contentMediaType" => "string content must match the declared encoding",
        "$ref" => "referenced schema must resolve",
        "oneOf" => "value must match exactly one alternative",
        "anyOf" => "value must match at least one alternative",
        "allOf" => "value must match every subschema",
        "not" => "value must not match the excluded schema",
        "false" => "no value is allowed here",
        SCHEMA_KEYWORD => "schema must accept the value",
        other => return format!("constraint \"{other}\" must hold"),
    };
    text.to_string()
}

fn truncate(rendered: &str) -> String {
    if rendered.chars().count() <= MAX_ACTUAL_LEN {
        rendered.to_string()
    } else {
        let head: String = rendered.chars().take(MAX_ACTUAL_LEN).collect();
        format!("{head}...")
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// The result of validating one sub-document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    violations: Vec<Violation>,
}

impl ValidationOutcome {
    /// A passing outcome.
    pub fn passed() -> Self {
        Self::default()
    }

    /// An outcome with the given violations.
    pub fn failed(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Whether no violations were found.
    pub fn is_pass(&self) -> bool {
        self.violations.is_empty()
    }

    /// Violations in validator order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

// ---------------------------------------------------------------------------
// Schema retriever for $ref resolution
// ---------------------------------------------------------------------------

/// Resolves `$ref` URIs against schemas already known to the store, so
/// compiling a validator never reaches the network.
struct LocalSchemaRetriever {
    schemas: HashMap<String, Value>,
}

impl jsonschema::Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &jsonschema::Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        self.schemas
            .get(normalize_ref(uri_str))
            .cloned()
            .ok_or_else(|| format!("schema not found for URI: {uri_str}").into())
    }
}

// ---------------------------------------------------------------------------
// SchemaValidator
// ---------------------------------------------------------------------------

/// Validates sub-documents against schemas obtained from a [`SchemaStore`].
#[derive(Clone)]
pub struct SchemaValidator {
    store: Arc<dyn SchemaStore>,
}

impl fmt::Debug for SchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaValidator").finish_non_exhaustive()
    }
}

impl SchemaValidator {
    /// Create a validator over the given store.
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self { store }
    }

    /// Validate `instance` against the schema named by `schema_ref`.
    pub async fn validate(&self, instance: &Value, schema_ref: &str) -> ValidationOutcome {
        match self.try_validate(instance, schema_ref).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(schema_ref, error = %e, "schema unavailable for validation");
                ValidationOutcome::failed(vec![Violation::schema_unavailable(&e)])
            }
        }
    }

    async fn try_validate(
        &self,
        instance: &Value,
        schema_ref: &str,
    ) -> Result<ValidationOutcome, SchemaError> {
        let schema = self.store.fetch(schema_ref).await?;

        let resources = self.store.resources();
        let retriever = LocalSchemaRetriever {
            schemas: resources.clone(),
        };
        let validator = jsonschema::options()
            .with_retriever(retriever)
            .build(&schema)
            .map_err(|e| SchemaError::SchemaCompileError {
                schema_ref: schema_ref.to_string(),
                reason: e.to_string(),
            })?;

        let violations: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|err| Violation::from_validation_error(&err, &schema, &resources))
            .collect();

        tracing::debug!(
            schema_ref,
            violation_count = violations.len(),
            "validated sub-document"
        );
        Ok(ValidationOutcome::failed(violations))
    }
}
