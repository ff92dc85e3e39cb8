use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while resolving or loading a channel schema.
///
/// These are configuration/setup errors surfaced to the caller; a
/// non-conforming *document* is never an error and comes back as
/// `ValidationIssue` data instead.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Requested channel is not in the statically known set.
    #[error("unsupported channel '{channel}'; supported: {supported}")]
    UnsupportedChannel { channel: String, supported: String },

    /// No static file, no cached copy, and fallback generation is disabled.
    #[error("no schema available for channel '{channel}' (looked for {path:?})")]
    SchemaNotFound { channel: String, path: PathBuf },

    /// Schema file failed the bundled meta-schema contract check.
    #[error("schema {path:?} failed contract validation:\n{details}")]
    Contract { path: PathBuf, details: String },

    /// Schema file could not be parsed as JSON or as the typed model.
    #[error("schema {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure reading a schema or writing the fallback cache.
    #[error("schema io failure at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
