//! Resolves channel keys to loaded policy schemas.
//!
//! Resolution order per channel: static schema file, previously cached copy,
//! then (when enabled) a generated minimal stub that is persisted to the
//! cache exactly once. Loaded schemas are memoized in memory for the process
//! lifetime, so repeat loads are lock-then-map-hit with no re-parsing.

use crate::schema::contract::check_schema_contract;
use crate::schema::error::SchemaError;
use crate::schema::fallback;
use crate::schema::model::{PolicyDefinition, PolicySchema};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

struct ChannelEntry {
    channel: &'static str,
    filename: &'static str,
    // Version stamped into generated stubs; real files carry their own.
    stub_version: &'static str,
}

const CHANNELS: &[ChannelEntry] = &[
    ChannelEntry {
        channel: "esr-140",
        filename: "firefox-esr-140.json",
        stub_version: "140.5.0",
    },
    ChannelEntry {
        channel: "release-144",
        filename: "firefox-release-144.json",
        stub_version: "144.0",
    },
];

/// Supported channel keys with their schema filenames.
pub fn available_channels() -> Vec<(&'static str, &'static str)> {
    CHANNELS
        .iter()
        .map(|entry| (entry.channel, entry.filename))
        .collect()
}

fn channel_entry(channel: &str) -> Option<&'static ChannelEntry> {
    CHANNELS.iter().find(|entry| entry.channel == channel)
}

fn supported_list() -> String {
    CHANNELS
        .iter()
        .map(|entry| entry.channel)
        .collect::<Vec<_>>()
        .join(", ")
}

/// In-memory store of loaded channel schemas backed by on-disk files.
pub struct SchemaRepository {
    schemas_dir: PathBuf,
    cache_dir: PathBuf,
    allow_fallback: bool,
    loaded: Mutex<BTreeMap<String, Arc<PolicySchema>>>,
}

impl SchemaRepository {
    /// Create a repository over explicit schema and cache directories.
    ///
    /// Fallback stub generation is enabled by default; disable it with
    /// [`SchemaRepository::with_fallback`].
    pub fn new(schemas_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            schemas_dir: schemas_dir.into(),
            cache_dir: cache_dir.into(),
            allow_fallback: true,
            loaded: Mutex::new(BTreeMap::new()),
        }
    }

    /// Repository over the crate's default directories (see `crate::default_schema_dir`).
    pub fn from_env() -> Self {
        Self::new(crate::default_schema_dir(), crate::default_cache_dir())
    }

    pub fn with_fallback(mut self, allow: bool) -> Self {
        self.allow_fallback = allow;
        self
    }

    /// Load the schema for a channel, memoizing the result.
    ///
    /// The mutex is held across the whole resolve/read/cache sequence so a
    /// missing channel's fallback stub is written to the cache exactly once
    /// even under concurrent first loads.
    pub fn load(&self, channel: &str) -> Result<Arc<PolicySchema>, SchemaError> {
        let entry = channel_entry(channel).ok_or_else(|| SchemaError::UnsupportedChannel {
            channel: channel.to_string(),
            supported: supported_list(),
        })?;

        let mut loaded = self.loaded.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(schema) = loaded.get(channel) {
            return Ok(schema.clone());
        }

        let schema = Arc::new(self.resolve(entry)?);
        loaded.insert(channel.to_string(), schema.clone());
        Ok(schema)
    }

    /// Convenience lookup of a single policy definition for a channel.
    pub fn policy_definition(
        &self,
        channel: &str,
        policy_id: &str,
    ) -> Result<Option<PolicyDefinition>, SchemaError> {
        let schema = self.load(channel)?;
        Ok(schema.get_policy(policy_id).cloned())
    }

    fn resolve(&self, entry: &ChannelEntry) -> Result<PolicySchema, SchemaError> {
        let static_path = self.schemas_dir.join(entry.filename);
        if static_path.is_file() {
            return read_schema(&static_path);
        }

        let cache_path = self.cache_dir.join(entry.filename);
        if cache_path.is_file() {
            return read_schema(&cache_path);
        }

        if !self.allow_fallback {
            return Err(SchemaError::SchemaNotFound {
                channel: entry.channel.to_string(),
                path: static_path,
            });
        }

        let stub = fallback::minimal_schema(entry.channel, entry.stub_version);
        write_cache(&cache_path, &stub)?;
        Ok(stub)
    }
}

fn read_schema(path: &Path) -> Result<PolicySchema, SchemaError> {
    let data = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw: Value = serde_json::from_str(&data).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    check_schema_contract(path, &raw)?;
    serde_json::from_value(raw).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_cache(path: &Path, schema: &PolicySchema) -> Result<(), SchemaError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SchemaError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let pretty = serde_json::to_string_pretty(schema).map_err(|source| SchemaError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, pretty).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })
}
