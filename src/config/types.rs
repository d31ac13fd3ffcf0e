//! Configuration for the settings manager

use std::path::PathBuf;

use crate::storage::{FileOptionStore, JsonStorage, StorageBackend};

/// Default name of the persisted option blob
pub const DEFAULT_OPTION_NAME: &str = "wpseo_amp";

/// Configuration for initializing the SettingsManager
#[derive(Clone, Debug)]
pub struct SettingsConfig<S: StorageBackend = JsonStorage> {
    /// Directory where option files will be stored
    pub config_dir: PathBuf,

    /// Name of the option blob (file stem for file-backed stores)
    pub option_name: String,

    /// Storage backend implementation
    pub storage: S,
}

impl Default for SettingsConfig<JsonStorage> {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("."),
            option_name: DEFAULT_OPTION_NAME.into(),
            storage: JsonStorage::new(),
        }
    }
}

impl<S: StorageBackend> SettingsConfig<S> {
    /// Get the full path of the option file
    pub fn option_path(&self) -> PathBuf {
        self.file_store().option_path(&self.option_name)
    }

    /// File-backed option store rooted at `config_dir`
    pub fn file_store(&self) -> FileOptionStore<S> {
        FileOptionStore::new(self.config_dir.clone(), self.storage.clone())
    }
}

impl SettingsConfig<JsonStorage> {
    /// Create a new builder for SettingsConfig
    ///
    /// # Example
    /// ```rust
    /// use ampglue::SettingsConfig;
    ///
    /// let config = SettingsConfig::builder("my-site")
    ///     .config_dir("/tmp/my-site")
    ///     .build();
    /// assert_eq!(config.option_name, "wpseo_amp");
    /// ```
    pub fn builder(app_name: impl Into<String>) -> SettingsConfigBuilder {
        SettingsConfigBuilder::new(app_name)
    }
}

/// Builder for creating SettingsConfig with a fluent API
#[derive(Clone, Debug)]
pub struct SettingsConfigBuilder<S: StorageBackend = JsonStorage> {
    app_name: String,
    config_dir: Option<PathBuf>,
    option_name: String,
    storage: S,
}

impl SettingsConfigBuilder<JsonStorage> {
    /// Create a new builder; `app_name` picks the system config subdirectory
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            config_dir: None,
            option_name: DEFAULT_OPTION_NAME.into(),
            storage: JsonStorage::new(),
        }
    }

    /// Use compact JSON (no pretty printing)
    pub fn compact_json(mut self) -> Self {
        self.storage = JsonStorage::compact();
        self
    }
}

impl<S: StorageBackend> SettingsConfigBuilder<S> {
    /// Set the configuration directory
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = match (path.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => path,
        };
        self.config_dir = Some(expanded);
        self
    }

    /// Set the option name (default: `wpseo_amp`)
    pub fn option_name(mut self, name: impl Into<String>) -> Self {
        self.option_name = name.into();
        self
    }

    /// Switch the storage format
    pub fn with_storage<T: StorageBackend + Default>(self) -> SettingsConfigBuilder<T> {
        SettingsConfigBuilder {
            app_name: self.app_name,
            config_dir: self.config_dir,
            option_name: self.option_name,
            storage: T::default(),
        }
    }

    /// Build the SettingsConfig
    ///
    /// If `config_dir` is not set, uses the system config directory for the app.
    pub fn build(self) -> SettingsConfig<S> {
        let config_dir = self.config_dir.unwrap_or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(&self.app_name))
                .unwrap_or_else(|| PathBuf::from("."))
        });

        SettingsConfig {
            config_dir,
            option_name: self.option_name,
            storage: self.storage,
        }
    }
}
