//! Meta-schema enforcement for channel schema files.
//!
//! Every schema file is checked against the bundled contract in
//! `schema/policy_schema.schema.json` before the typed model is built, so a
//! malformed or hand-edited file fails loudly at load time instead of
//! producing confusing validation results later. This is a contract on schema
//! files themselves; policy documents are validated by the structural walker
//! in `crate::validation`.

use crate::schema::error::SchemaError;
use jsonschema::JSONSchema;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const CONTRACT_JSON: &str = include_str!("../../schema/policy_schema.schema.json");
const CONTRACT_PATH: &str = "schema/policy_schema.schema.json";

/// Validate a raw schema payload against the bundled contract.
///
/// Loads are memoized per channel by the repository, so compiling the
/// contract per call keeps lifetimes simple without measurable cost.
pub(crate) fn check_schema_contract(path: &Path, raw: &Value) -> Result<(), SchemaError> {
    let contract: Value =
        serde_json::from_str(CONTRACT_JSON).map_err(|source| SchemaError::Parse {
            path: PathBuf::from(CONTRACT_PATH),
            source,
        })?;

    // The compiled validator borrows the schema payload for its own lifetime;
    // pin it behind an Arc that outlives the validator in this scope.
    let contract_arc = Arc::new(contract);
    let contract_static: &'static Value = unsafe { &*(Arc::as_ptr(&contract_arc)) };
    let compiled = JSONSchema::compile(contract_static).map_err(|err| SchemaError::Contract {
        path: PathBuf::from(CONTRACT_PATH),
        details: err.to_string(),
    })?;

    if let Err(errors) = compiled.validate(raw) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        return Err(SchemaError::Contract {
            path: path.to_path_buf(),
            details,
        });
    }

    Ok(())
}
