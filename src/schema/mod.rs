//! Channel schema wiring.
//!
//! This module wraps the internal policy schema files under
//! `schemas/policies/` so callers can resolve a channel key to a typed,
//! contract-checked [`PolicySchema`]. Use [`SchemaRepository`] for cached
//! loads; the validation engine in `crate::validation` consumes the loaded
//! model.

pub mod contract;
pub mod error;
pub mod fallback;
pub mod model;
pub mod repository;
pub mod value_type;

pub use error::SchemaError;
pub use model::{PolicyDefinition, PolicySchema, PropertySchema};
pub use repository::{SchemaRepository, available_channels};
pub use value_type::{ValueType, runtime_type_name};
