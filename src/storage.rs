//! Storage backends and the option store
//!
//! Options are persisted as one named blob (a flat key/value object). An
//! [`OptionStore`] reads and writes those blobs by name; [`FileOptionStore`]
//! keeps one file per option using a [`StorageBackend`] format, and
//! [`MemoryOptionStore`] keeps them in process memory.

use crate::error::{Error, Result};
use crate::settings::RawOptions;
use crate::sync::RwLockExt;
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for storage backend implementations
///
/// This allows swapping JSON for TOML, YAML, or other formats.
pub trait StorageBackend: Clone + Send + Sync {
    /// File extension for this storage format (e.g., "json", "toml")
    fn extension(&self) -> &str;

    /// Serialize data to string
    fn serialize<T: Serialize>(&self, data: &T) -> Result<String>;

    /// Deserialize data from string
    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T>;

    /// Read and deserialize from file
    fn read<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.deserialize(&content)
    }

    /// Serialize and write to file
    ///
    /// Uses atomic write: writes to temp file then renames to prevent corruption.
    fn write<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let content = self.serialize(data)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let file_name = path.file_name().ok_or_else(|| {
            Error::Config(format!(
                "Invalid path '{}': must have a filename",
                path.display()
            ))
        })?;
        let mut temp_filename = file_name.to_os_string();
        temp_filename.push(".tmp");
        let temp_path = path.with_file_name(temp_filename);

        std::fs::write(&temp_path, &content).map_err(|e| Error::FileWrite {
            path: temp_path.clone(),
            source: e,
        })?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::FileWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

// =============================================================================
// JSON Storage Implementation
// =============================================================================

/// JSON storage backend (default)
#[derive(Clone, Debug, Default)]
pub struct JsonStorage {
    /// Pretty print JSON output
    pretty: bool,
}

impl JsonStorage {
    /// Create a new JSON storage backend with pretty printing enabled
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Create a compact JSON storage (no pretty printing)
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl StorageBackend for JsonStorage {
    fn extension(&self) -> &str {
        "json"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(data).map_err(Error::from)
        } else {
            serde_json::to_string(data).map_err(Error::from)
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_json::from_str(content).map_err(Error::from)
    }
}

// =============================================================================
// TOML Storage Implementation
// =============================================================================

/// TOML storage backend
///
/// TOML has no null, so null entries are left out of the written file.
#[cfg(feature = "toml")]
#[derive(Clone, Debug, Default)]
pub struct TomlStorage;

#[cfg(feature = "toml")]
impl TomlStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "toml")]
impl StorageBackend for TomlStorage {
    fn extension(&self) -> &str {
        "toml"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        let mut value = serde_json::to_value(data)?;
        drop_nulls(&mut value);
        toml::to_string_pretty(&value).map_err(|e| Error::Encode(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        toml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

#[cfg(feature = "toml")]
fn drop_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(drop_nulls);
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(drop_nulls);
        }
        _ => {}
    }
}

// =============================================================================
// YAML Storage Implementation
// =============================================================================

/// YAML storage backend
#[cfg(feature = "yaml")]
#[derive(Clone, Debug, Default)]
pub struct YamlStorage;

#[cfg(feature = "yaml")]
impl YamlStorage {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "yaml")]
impl StorageBackend for YamlStorage {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn serialize<T: Serialize>(&self, data: &T) -> Result<String> {
        serde_yaml::to_string(data).map_err(|e| Error::Encode(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        serde_yaml::from_str(content).map_err(|e| Error::Parse(e.to_string()))
    }
}

// =============================================================================
// Option Store
// =============================================================================

/// Named blob store holding option objects.
///
/// No locking is implied: concurrent `set` calls are last-write-wins.
pub trait OptionStore: Send + Sync {
    /// Read the option blob, `None` when it was never written.
    fn get(&self, name: &str) -> Result<Option<RawOptions>>;

    /// Replace the option blob.
    fn set(&self, name: &str, value: &RawOptions) -> Result<()>;
}

/// One file per option inside a directory.
#[derive(Clone)]
pub struct FileOptionStore<S: StorageBackend = JsonStorage> {
    dir: PathBuf,
    storage: S,
}

impl<S: StorageBackend> FileOptionStore<S> {
    pub fn new(dir: impl Into<PathBuf>, storage: S) -> Self {
        Self {
            dir: dir.into(),
            storage,
        }
    }

    /// Path of the file backing option `name`
    pub fn option_path(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{name}.{}", self.storage.extension()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl<S: StorageBackend> OptionStore for FileOptionStore<S> {
    fn get(&self, name: &str) -> Result<Option<RawOptions>> {
        let path = self.option_path(name);
        let value: Value = match self.storage.read(&path) {
            Ok(v) => v,
            Err(e) if e.is_not_found() => {
                debug!("Option '{name}' has no file at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match value {
            Value::Object(map) => Ok(Some(map)),
            Value::Null => Ok(None),
            other => Err(Error::Parse(format!(
                "Option '{name}' is not an object (found {})",
                json_type_name(&other)
            ))),
        }
    }

    fn set(&self, name: &str, value: &RawOptions) -> Result<()> {
        let path = self.option_path(name);
        self.storage.write(&path, value)?;
        debug!("Option '{name}' written to {}", path.display());
        Ok(())
    }
}

/// In-process option store, mostly for hosts that persist elsewhere and tests.
#[derive(Default)]
pub struct MemoryOptionStore {
    options: RwLock<HashMap<String, RawOptions>>,
    writes: AtomicUsize,
}

impl MemoryOptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an option without counting it as a write
    #[must_use]
    pub fn with_option(self, name: &str, value: RawOptions) -> Self {
        self.options.write_recovered().insert(name.to_string(), value);
        self
    }

    /// Number of `set` calls served so far
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl OptionStore for MemoryOptionStore {
    fn get(&self, name: &str) -> Result<Option<RawOptions>> {
        Ok(self.options.read_recovered().get(name).cloned())
    }

    fn set(&self, name: &str, value: &RawOptions) -> Result<()> {
        self.options
            .write_recovered()
            .insert(name.to_string(), value.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn blob(value: Value) -> RawOptions {
        match value {
            Value::Object(map) => map,
            _ => panic!("test blob must be an object"),
        }
    }

    #[test]
    fn test_json_serialize_pretty_and_compact() {
        let data = blob(json!({"version": 1, "header-color": "#fff"}));

        let pretty = JsonStorage::new().serialize(&data).unwrap();
        assert!(pretty.contains('\n'));
        assert!(pretty.contains("\"header-color\": \"#fff\""));

        let compact = JsonStorage::compact().serialize(&data).unwrap();
        assert!(!compact.contains('\n'));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileOptionStore::new(dir.path().join("options"), JsonStorage::new());
        let data = blob(json!({"version": 1, "post_types-post-amp": "on"}));

        assert!(store.get("wpseo_amp").unwrap().is_none());

        store.set("wpseo_amp", &data).unwrap();
        assert!(dir.path().join("options/wpseo_amp.json").exists());
        assert_eq!(store.get("wpseo_amp").unwrap(), Some(data));
    }

    #[test]
    fn test_file_store_rejects_non_object() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("wpseo_amp.json"), "[1, 2, 3]").unwrap();
        let store = FileOptionStore::new(dir.path(), JsonStorage::new());

        let result = store.get("wpseo_amp");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_file_store_null_is_empty() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("wpseo_amp.json"), "null").unwrap();
        let store = FileOptionStore::new(dir.path(), JsonStorage::new());

        assert!(store.get("wpseo_amp").unwrap().is_none());
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_serialize_drops_nulls() {
        let data = blob(json!({
            "legacy": null,
            "kept": "yes",
            "nested": {"gone": null, "list": [1, null, 2]},
        }));

        let content = TomlStorage::new().serialize(&data).unwrap();
        assert!(!content.contains("legacy"));
        assert!(!content.contains("gone"));
        assert!(content.contains("kept = \"yes\""));

        let back: Value = TomlStorage::new().deserialize(&content).unwrap();
        assert_eq!(back["nested"]["list"], json!([1, 2]));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_encode_failure_is_not_a_parse_error() {
        let result = TomlStorage::new().serialize(&json!(1));
        assert!(matches!(result, Err(Error::Encode(_))), "{result:?}");
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryOptionStore::new()
            .with_option("wpseo_amp", blob(json!({"legacy": "kept"})));
        assert_eq!(store.writes(), 0);

        let current = store.get("wpseo_amp").unwrap().unwrap();
        assert_eq!(current.get("legacy"), Some(&json!("kept")));

        store.set("wpseo_amp", &blob(json!({}))).unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get("wpseo_amp").unwrap(), Some(RawOptions::new()));
    }
}
