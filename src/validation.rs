//! Structural validation of policy documents against a loaded schema.
//!
//! The walker accumulates every issue rather than short-circuiting so callers
//! can surface all document problems at once. It never fails: garbage input
//! becomes issues, and the only hard errors in the crate are the schema
//! loading failures in `crate::schema`. Recursion is fixed at two levels
//! (policy then object property); arrays are terminal.

use crate::schema::error::SchemaError;
use crate::schema::model::{PolicyDefinition, PolicySchema, PropertySchema};
use crate::schema::repository::SchemaRepository;
use crate::schema::value_type::{ValueType, runtime_type_name};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Channel assumed by [`validate_payload`] when the payload names none.
pub const DEFAULT_CHANNEL: &str = "release-144";

const TOP_LEVEL_MESSAGE: &str = "Expected object with policy mappings";

/// One step into the document: an object key or an array index.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Single validation problem, localized to a path within the document.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub policy: Option<String>,
    pub path: Vec<PathSegment>,
    pub message: String,
}

/// Outcome of validating one document; `ok` iff `issues` is empty.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Issues are sorted by (policy, path, message) so repeated runs over the
    /// same inputs are byte-for-byte identical regardless of walk order.
    fn from_issues(mut issues: Vec<ValidationIssue>) -> Self {
        issues.sort_by(|a, b| {
            (&a.policy, &a.path, &a.message).cmp(&(&b.policy, &b.path, &b.message))
        });
        Self {
            ok: issues.is_empty(),
            issues,
        }
    }
}

/// Uniform view over the constraint fields shared by top-level policies and
/// object properties, so the node walker does not care which one it is given.
struct NodeSchema<'a> {
    value_type: &'a ValueType,
    enum_values: Option<&'a [Value]>,
    items_type: Option<&'a ValueType>,
}

impl<'a> From<&'a PolicyDefinition> for NodeSchema<'a> {
    fn from(definition: &'a PolicyDefinition) -> Self {
        Self {
            value_type: &definition.value_type,
            enum_values: definition.enum_values.as_deref(),
            items_type: definition.items_type.as_ref(),
        }
    }
}

impl<'a> From<&'a PropertySchema> for NodeSchema<'a> {
    fn from(property: &'a PropertySchema) -> Self {
        Self {
            value_type: &property.value_type,
            enum_values: property.enum_values.as_deref(),
            items_type: property.items_type.as_ref(),
        }
    }
}

/// Validate a mapping of policy id to value against a loaded schema.
///
/// Pure function over its inputs; safe to call concurrently on a shared
/// schema. An empty issue list means the document is valid.
pub fn validate_document(document: &Value, schema: &PolicySchema) -> ValidationResult {
    let Some(entries) = document.as_object() else {
        return ValidationResult::from_issues(vec![ValidationIssue {
            policy: None,
            path: Vec::new(),
            message: TOP_LEVEL_MESSAGE.to_string(),
        }]);
    };

    let mut issues = Vec::new();
    for (policy_id, value) in entries {
        let path = vec![PathSegment::from("policies"), PathSegment::Key(policy_id.clone())];

        let Some(definition) = schema.get_policy(policy_id) else {
            issues.push(issue(
                policy_id,
                path,
                format!("Unknown policy '{policy_id}'"),
            ));
            continue;
        };

        if matches!(definition.value_type, ValueType::Object) {
            validate_object_policy(value, definition, policy_id, &path, &mut issues);
        } else {
            validate_node(value, &NodeSchema::from(definition), policy_id, &path, &mut issues);
        }
    }

    ValidationResult::from_issues(issues)
}

/// Payload wrapper helper for callers holding a `{channel, policies}` body.
///
/// Picks the schema by the payload's `channel` (defaulting to
/// [`DEFAULT_CHANNEL`]) and validates the nested `policies` mapping.
/// Repository failures propagate typed; document problems come back as data.
pub fn validate_payload(
    payload: &Value,
    repository: &SchemaRepository,
) -> Result<ValidationResult, SchemaError> {
    let channel = payload
        .get("channel")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_CHANNEL);
    let schema = repository.load(channel)?;

    match payload.get("policies") {
        Some(policies) if !policies.is_object() => {
            Ok(ValidationResult::from_issues(vec![ValidationIssue {
                policy: None,
                path: vec![PathSegment::from("policies")],
                message: TOP_LEVEL_MESSAGE.to_string(),
            }]))
        }
        Some(policies) => Ok(validate_document(policies, &schema)),
        None => Ok(validate_document(&Value::Object(Map::new()), &schema)),
    }
}

fn validate_object_policy(
    value: &Value,
    definition: &PolicyDefinition,
    policy_id: &str,
    path: &[PathSegment],
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(fields) = value.as_object() else {
        issues.push(issue(
            policy_id,
            path.to_vec(),
            format!(
                "Expected object for policy '{policy_id}', got '{}'",
                runtime_type_name(value)
            ),
        ));
        return;
    };

    if !definition.properties.is_empty() && !definition.additional_properties {
        for key in fields.keys() {
            if !definition.properties.contains_key(key) {
                let mut key_path = path.to_vec();
                key_path.push(PathSegment::Key(key.clone()));
                issues.push(issue(
                    policy_id,
                    key_path,
                    format!("Unknown property '{key}' for policy '{policy_id}'"),
                ));
            }
        }
    }

    for (prop_name, prop_schema) in &definition.properties {
        // Declared properties absent from the document are accepted; the
        // upstream templates are illustrative, not a strict required-set.
        let Some(prop_value) = fields.get(prop_name) else {
            continue;
        };
        let mut prop_path = path.to_vec();
        prop_path.push(PathSegment::Key(prop_name.clone()));
        validate_node(
            prop_value,
            &NodeSchema::from(prop_schema),
            policy_id,
            &prop_path,
            issues,
        );
    }
}

fn validate_node(
    value: &Value,
    node: &NodeSchema<'_>,
    policy_id: &str,
    path: &[PathSegment],
    issues: &mut Vec<ValidationIssue>,
) {
    if !node.value_type.matches(value) {
        issues.push(issue(
            policy_id,
            path.to_vec(),
            format!(
                "Expected type '{}', got '{}'",
                node.value_type.as_str(),
                runtime_type_name(value)
            ),
        ));
        // A wrong-typed node would only produce cascading noise below.
        return;
    }

    if matches!(node.value_type, ValueType::Array) {
        let Some(items) = value.as_array() else {
            return;
        };

        for (index, item) in items.iter().enumerate() {
            let mut elem_path = path.to_vec();
            elem_path.push(PathSegment::Index(index));

            // Enum and item-type checks are independent; one element can
            // produce both issues.
            if let Some(allowed) = node.enum_values {
                if !allowed.contains(item) {
                    issues.push(issue(
                        policy_id,
                        elem_path.clone(),
                        format!(
                            "Value '{}' is not allowed; expected one of {}",
                            display_value(item),
                            display_values(allowed)
                        ),
                    ));
                }
            }

            if let Some(items_type) = node.items_type {
                if !items_type.matches(item) {
                    issues.push(issue(
                        policy_id,
                        elem_path,
                        format!(
                            "Expected item type '{}', got '{}'",
                            items_type.as_str(),
                            runtime_type_name(item)
                        ),
                    ));
                }
            }
        }
    } else if let Some(allowed) = node.enum_values {
        if !allowed.contains(value) {
            issues.push(issue(
                policy_id,
                path.to_vec(),
                format!(
                    "Value '{}' is not allowed; expected one of {}",
                    display_value(value),
                    display_values(allowed)
                ),
            ));
        }
    }
}

fn issue(policy_id: &str, path: Vec<PathSegment>, message: String) -> ValidationIssue {
    ValidationIssue {
        policy: Some(policy_id.to_string()),
        path,
        message,
    }
}

// Strings render bare in messages; everything else as compact JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn display_values(values: &[Value]) -> String {
    let rendered: Vec<String> = values.iter().map(display_value).collect();
    format!("[{}]", rendered.join(", "))
}
