use policyvet::SchemaRepository;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch schema + cache directories for one repository under test.
pub struct SchemaDirs {
    pub schemas: TempDir,
    pub cache: TempDir,
}

pub fn empty_dirs() -> SchemaDirs {
    SchemaDirs {
        schemas: TempDir::new().expect("failed to allocate schemas dir"),
        cache: TempDir::new().expect("failed to allocate cache dir"),
    }
}

pub fn repository(dirs: &SchemaDirs) -> SchemaRepository {
    SchemaRepository::new(dirs.schemas.path(), dirs.cache.path())
}

/// Repository over the schema files shipped in the source tree, with a
/// throwaway cache so tests never write into the repository.
pub fn shipped_repository(cache: &TempDir) -> SchemaRepository {
    SchemaRepository::new(shipped_schema_dir(), cache.path())
}

pub fn shipped_schema_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas/policies")
}

pub fn write_schema(dir: &Path, filename: &str, schema: &Value) {
    let pretty = serde_json::to_string_pretty(schema).expect("schema fixture serializes");
    fs::write(dir.join(filename), pretty).expect("failed to write schema fixture");
}
