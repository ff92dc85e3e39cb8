//! Deserializable representation of the internal policy schema files.
//!
//! The types mirror the schema file layout so the validation engine and tests
//! can reason about policy constraints without ad-hoc JSON handling. Nesting
//! is fixed at one level: object policies declare flat properties, and a
//! property never declares properties of its own.

use crate::schema::value_type::ValueType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Top-level schema for all policies of a given channel/version.
///
/// Immutable once loaded; the repository shares instances behind `Arc` so
/// `validate_document` can run concurrently without locking.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PolicySchema {
    pub channel: String,
    pub version: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyDefinition>,
}

impl PolicySchema {
    /// Return a policy definition by id if it exists.
    pub fn get_policy(&self, policy_id: &str) -> Option<&PolicyDefinition> {
        self.policies.get(policy_id)
    }
}

/// Describes a single enterprise policy.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PolicyDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<String>,
    #[serde(default)]
    pub deprecated: bool,

    // Constraints for non-object policies; `enum` applies to scalars or to
    // array elements, `items_type` to array elements only.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_type: Option<ValueType>,

    // Object schema.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default = "default_true")]
    pub additional_properties: bool,
}

/// Describes a single property inside an object-type policy.
///
/// `minimum`/`maximum`/`default`/`required` are descriptive metadata carried
/// by the schema files; the engine does not enforce them. Declared properties
/// absent from a document are always accepted.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PropertySchema {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: ValueType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_key: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_type: Option<ValueType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
}

fn default_true() -> bool {
    true
}
