//! Generated stub schemas for channels with no static or cached file.
//!
//! The stub covers only boolean kill-switch policies so an offline deployment
//! can still validate the most common lockdown documents. It is tagged with
//! `FALLBACK_SOURCE` to keep cached stubs distinguishable from real schema
//! files, and the repository persists it to the cache so repeat loads are
//! reproducible.

use crate::schema::model::{PolicyDefinition, PolicySchema};
use crate::schema::value_type::ValueType;
use std::collections::BTreeMap;

/// `source` marker written into every generated stub.
pub const FALLBACK_SOURCE: &str = "policyvet-fallback";

const STUB_POLICY_IDS: &[&str] = &[
    "BlockAboutConfig",
    "DisableAppUpdate",
    "DisableFirefoxStudies",
    "DisableTelemetry",
];

/// Build the minimal stub schema for a channel.
pub fn minimal_schema(channel: &str, version: &str) -> PolicySchema {
    let mut policies = BTreeMap::new();
    for id in STUB_POLICY_IDS {
        policies.insert((*id).to_string(), boolean_policy(id));
    }

    PolicySchema {
        channel: channel.to_string(),
        version: version.to_string(),
        source: FALLBACK_SOURCE.to_string(),
        policies,
    }
}

fn boolean_policy(id: &str) -> PolicyDefinition {
    PolicyDefinition {
        id: id.to_string(),
        value_type: ValueType::Boolean,
        description_key: Some(format!("policy.{id}")),
        categories: Vec::new(),
        min_version: None,
        max_version: None,
        deprecated: false,
        enum_values: None,
        items_type: None,
        properties: BTreeMap::new(),
        additional_properties: true,
    }
}
