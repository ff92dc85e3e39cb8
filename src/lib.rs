//! Shared library for the policyvet helpers.
//!
//! The crate exposes the channel schema model, the repository that resolves
//! channel keys to contract-checked schemas, and the structural validation
//! engine that walks a policy document and accumulates issues. Public
//! functions here form the contract the helper binaries depend on: schema
//! directory discovery and the validate/load entry points.

use std::path::PathBuf;
use std::{env, fs};

pub mod schema;
pub mod validation;

pub use schema::{
    PolicyDefinition, PolicySchema, PropertySchema, SchemaError, SchemaRepository, ValueType,
    available_channels, runtime_type_name,
};
pub use validation::{
    DEFAULT_CHANNEL, PathSegment, ValidationIssue, ValidationResult, validate_document,
    validate_payload,
};

const SCHEMAS_SUBDIR: &str = "schemas/policies";
const CACHE_SUBDIR: &str = "schemas/cache";

/// Directory holding the static channel schema files.
///
/// Honors `POLICYVET_SCHEMA_DIR` when set; otherwise resolves
/// `schemas/policies/` under the crate root (via the build-time hint, so
/// installed binaries keep working from other working directories).
pub fn default_schema_dir() -> PathBuf {
    if let Some(dir) = env::var_os("POLICYVET_SCHEMA_DIR") {
        return PathBuf::from(dir);
    }
    schema_root().join(SCHEMAS_SUBDIR)
}

/// Directory where generated fallback schemas are cached.
///
/// Honors `POLICYVET_CACHE_DIR`; defaults to `schemas/cache/` next to the
/// static files.
pub fn default_cache_dir() -> PathBuf {
    if let Some(dir) = env::var_os("POLICYVET_CACHE_DIR") {
        return PathBuf::from(dir);
    }
    schema_root().join(CACHE_SUBDIR)
}

fn schema_root() -> PathBuf {
    if let Some(hint) = option_env!("POLICYVET_SCHEMA_ROOT_HINT") {
        let candidate = PathBuf::from(hint);
        if candidate.join(SCHEMAS_SUBDIR).is_dir() {
            return fs::canonicalize(&candidate).unwrap_or(candidate);
        }
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}
