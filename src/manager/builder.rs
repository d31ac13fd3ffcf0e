//! Builder for SettingsManager
//!
//! This module contains [`SettingsManagerBuilder`] which provides a fluent API
//! for creating a [`SettingsManager`](super::SettingsManager).

use crate::config::SettingsConfigBuilder;
use crate::error::Result;
use crate::metadata::ImageResolver;
use crate::registry::{PostTypeRegistry, StaticPostTypes};
use crate::storage::{JsonStorage, OptionStore, StorageBackend};
use std::path::PathBuf;
use std::sync::Arc;

use super::SettingsManager;

/// Builder for creating a [`SettingsManager`] with a fluent API.
///
/// Without a registry the built-in post types (`post`, `page`,
/// `attachment`) are used. Without a custom store the blob is kept as a
/// file in the config directory.
///
/// # Example
///
/// ```rust,no_run
/// use ampglue::{SettingsManager, StaticPostTypes};
/// use std::sync::Arc;
///
/// let registry = StaticPostTypes::builtin().with("book", "Books");
/// let manager = SettingsManager::builder("my-site")
///     .config_dir("~/.config/my-site")
///     .with_registry(Arc::new(registry))
///     .build()
///     .unwrap();
/// ```
pub struct SettingsManagerBuilder<S: StorageBackend = JsonStorage> {
    config_builder: SettingsConfigBuilder<S>,
    registry: Option<Arc<dyn PostTypeRegistry>>,
    store: Option<Arc<dyn OptionStore>>,
    images: Option<Arc<dyn ImageResolver>>,
}

impl SettingsManagerBuilder {
    /// Create a new builder with the required app name.
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            config_builder: SettingsConfigBuilder::new(app_name),
            registry: None,
            store: None,
            images: None,
        }
    }

    /// Use compact JSON (no pretty printing).
    pub fn compact_json(mut self) -> Self {
        self.config_builder = self.config_builder.compact_json();
        self
    }
}

impl<S: StorageBackend + 'static> SettingsManagerBuilder<S> {
    /// Set the configuration directory.
    ///
    /// Supports `~` expansion for home directory.
    pub fn config_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_builder = self.config_builder.config_dir(path);
        self
    }

    /// Set the option name (default: `wpseo_amp`).
    pub fn option_name(mut self, name: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.option_name(name);
        self
    }

    /// Switch the file format of the stored blob.
    pub fn with_storage<T: StorageBackend + Default + 'static>(self) -> SettingsManagerBuilder<T> {
        SettingsManagerBuilder {
            config_builder: self.config_builder.with_storage::<T>(),
            registry: self.registry,
            store: self.store,
            images: self.images,
        }
    }

    /// Read post types from the host.
    pub fn with_registry(mut self, registry: Arc<dyn PostTypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Persist through `store` instead of a file.
    pub fn with_store(mut self, store: Arc<dyn OptionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Validate image sizes through `images`.
    pub fn with_image_resolver(mut self, images: Arc<dyn ImageResolver>) -> Self {
        self.images = Some(images);
        self
    }

    /// Build the [`SettingsManager`].
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn build(self) -> Result<SettingsManager> {
        let config = self.config_builder.build();
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(StaticPostTypes::builtin()));

        let manager = match self.store {
            Some(store) => SettingsManager::with_store(config.option_name, store, registry),
            None => SettingsManager::new(config, registry)?,
        };

        Ok(match self.images {
            Some(images) => manager.with_image_resolver(images),
            None => manager,
        })
    }
}
