use crate::config::SettingsConfig;
use crate::error::{Error, Result};
use crate::events::EventManager;
use crate::manager::builder::SettingsManagerBuilder;
use crate::manager::cache::SettingsCache;
use crate::metadata::ImageResolver;
use crate::registry::PostTypeRegistry;
use crate::storage::{OptionStore, StorageBackend};

use log::info;
use std::sync::Arc;

/// Owner of the AMP option blob
///
/// The manager loads the blob lazily, keeps the reconciled settings cached
/// and routes every change through the sanitize pipeline:
///
/// - **Load**: defaults merged under the stored values, post type flags
///   reconciled with the registry, written back only when that changed them
/// - **Save**: registered validators, sanitize, persist, change events
/// - **Validate**: advisory checks for the admin form
///
/// # Example
///
/// ```rust,no_run
/// use ampglue::SettingsManager;
///
/// let manager = SettingsManager::builder("my-site")
///     .config_dir("~/.config/my-site")
///     .build()?;
///
/// let settings = manager.settings()?;
/// assert!(settings.post_types.is_enabled("post"));
/// # Ok::<(), ampglue::Error>(())
/// ```
pub struct SettingsManager {
    /// Name of the persisted blob
    pub(crate) option_name: String,

    /// Where the blob lives
    pub(crate) store: Arc<dyn OptionStore>,

    /// Public post types of the host
    pub(crate) registry: Arc<dyn PostTypeRegistry>,

    /// Media lookups for image size validation
    pub(crate) images: Option<Arc<dyn ImageResolver>>,

    /// Event manager for change callbacks and validation
    pub(crate) events: Arc<EventManager>,

    /// Reconciled settings
    pub(crate) cache: SettingsCache,
}

impl SettingsManager {
    /// Create a builder for `SettingsManager` with a fluent API.
    pub fn builder(app_name: impl Into<String>) -> SettingsManagerBuilder {
        SettingsManagerBuilder::new(app_name)
    }

    /// Create a manager storing its blob as a file under `config.config_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be created.
    pub fn new<S: StorageBackend + 'static>(
        config: SettingsConfig<S>,
        registry: Arc<dyn PostTypeRegistry>,
    ) -> Result<Self> {
        if !config.config_dir.exists() {
            std::fs::create_dir_all(&config.config_dir).map_err(|e| Error::DirectoryCreate {
                path: config.config_dir.clone(),
                source: e,
            })?;
        }

        info!(
            "Settings manager initialized: {}",
            config.option_path().display()
        );

        let store = Arc::new(config.file_store());
        Ok(Self::with_store(config.option_name, store, registry))
    }

    /// Create a manager over any option store.
    pub fn with_store(
        option_name: impl Into<String>,
        store: Arc<dyn OptionStore>,
        registry: Arc<dyn PostTypeRegistry>,
    ) -> Self {
        Self {
            option_name: option_name.into(),
            store,
            registry,
            images: None,
            events: Arc::new(EventManager::new()),
            cache: SettingsCache::new(),
        }
    }

    /// Enable image size validation through `images`.
    #[must_use]
    pub fn with_image_resolver(mut self, images: Arc<dyn ImageResolver>) -> Self {
        self.images = Some(images);
        self
    }

    /// Name of the persisted blob
    pub fn option_name(&self) -> &str {
        &self.option_name
    }

    /// Change listeners and validators
    pub fn events(&self) -> &EventManager {
        &self.events
    }

    pub fn registry(&self) -> &dyn PostTypeRegistry {
        self.registry.as_ref()
    }
}
