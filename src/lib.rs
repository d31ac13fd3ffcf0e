//! # ampglue - settings glue between an SEO plugin and an AMP renderer
//!
//! Owns the `wpseo_amp` option: raw form input is sanitized into typed
//! settings, persisted as one flat blob, read back with defaults and
//! per-post-type flags reconciled, and finally merged into the page
//! metadata the AMP renderer emits.
//!
//! ## Features
//!
//! - **Sanitize pipeline**: colors, CSS, restricted `<head>` code and
//!   `<amp-analytics>` snippets cleaned without ever failing
//! - **Advisory validation**: image sizes and disallowed markup reported,
//!   never corrected
//! - **Settings store**: lazy load, caching, reconciliation with the host's
//!   post types, change events
//! - **Metadata merge**: canonical URL, publisher, description, image and
//!   `@type` for every AMP page
//! - **Storage formats**: JSON by default, TOML and YAML behind features
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ampglue::{SettingsManager, StaticPostTypes};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn example() -> ampglue::Result<()> {
//! let manager = SettingsManager::builder("my-site")
//!     .config_dir("~/.config/my-site")
//!     .with_registry(Arc::new(StaticPostTypes::builtin()))
//!     .build()?;
//!
//! // Invalid colors are reset, everything else is cleaned
//! let saved = manager.save_setting("header-color", json!("#1e73be"))?;
//! assert_eq!(saved.color("header-color"), Some("#1e73be"));
//!
//! assert!(manager.is_amp_enabled("post")?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sanitizing Without a Store
//!
//! ```rust
//! use ampglue::sanitize;
//! use serde_json::json;
//!
//! let raw = json!({
//!     "header-color": "red",
//!     "extra-head": "<meta name=\"a\"><script>x()</script>",
//! });
//! let clean = sanitize(raw.as_object().unwrap(), &["post"]);
//!
//! assert_eq!(clean.color("header-color"), Some(""));
//! assert_eq!(clean.extra_head, "<meta name=\"a\">");
//! assert!(clean.post_types.is_enabled("post"));
//! ```
//!
//! ## Change Events
//!
//! ```rust
//! use ampglue::{MemoryOptionStore, SettingsManager, StaticPostTypes};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # fn example() -> ampglue::Result<()> {
//! let manager = SettingsManager::with_store(
//!     "wpseo_amp",
//!     Arc::new(MemoryOptionStore::new()),
//!     Arc::new(StaticPostTypes::builtin()),
//! );
//!
//! manager.events().watch("underline", |_key, old, new| {
//!     println!("underline: {old} -> {new}");
//! });
//! manager.events().add_validator("extra-css", |value| {
//!     if value.as_str().is_some_and(|css| css.len() > 50_000) {
//!         Err("CSS is too long".into())
//!     } else {
//!         Ok(())
//!     }
//! });
//!
//! manager.save_setting("underline", json!("none"))?;
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// Core modules
mod error;
mod events;
mod manager;
mod settings;
mod sync;
pub mod registry;
pub mod storage;

// Grouped modules
pub mod config;
pub mod metadata;
pub mod sanitize;
pub mod validate;

// Re-exports from core
pub use error::{Error, Result};
pub use events::{ChangeCallback, EventManager, RenderHook, SaveHook, Validator};
pub use manager::{PostTypeToggle, SettingsManager, SettingsManagerBuilder};
pub use registry::{PostType, PostTypeRegistry, StaticPostTypes};
pub use settings::{AmpSettings, ColorScheme, PostTypeFlags, RawOptions, Underline, value_text};
pub use storage::{FileOptionStore, JsonStorage, MemoryOptionStore, OptionStore, StorageBackend};

#[cfg(feature = "toml")]
pub use storage::TomlStorage;

#[cfg(feature = "yaml")]
pub use storage::YamlStorage;

// Re-exports from config
pub use config::{
    CURRENT_VERSION, DEFAULT_OPTION_NAME, OptionKind, SettingMetadata, SettingsConfig,
    SettingsConfigBuilder, defaults, schema,
};

// Pipeline entry points
pub use metadata::{MetadataEnricher, PageMetadata, PostContext};
pub use sanitize::{sanitize, validate_analytics_snippet};
pub use validate::{Validity, validate_image_constraint, validate_restricted_snippet};
