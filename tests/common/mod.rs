//! Common test utilities for ampglue integration tests
//!
//! Provides shared fixtures, collaborator fakes and helper functions.

#![allow(dead_code)]

use ampglue::metadata::{ImageObject, ImageResolver, ImageSize, PostContext, SeoFrontend};
use ampglue::validate::ImageDimensions;
use ampglue::{
    MemoryOptionStore, RawOptions, SettingsConfig, SettingsManager, StaticPostTypes,
};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Turn a `json!` object into raw options
pub fn raw(value: Value) -> RawOptions {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

// =============================================================================
// Collaborator fakes
// =============================================================================

/// Media library keyed by reference
#[derive(Default)]
pub struct FakeImages {
    images: HashMap<String, ImageObject>,
}

impl FakeImages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, reference: &str, url: &str, width: u32, height: u32) -> Self {
        self.images
            .insert(reference.to_string(), ImageObject::new(url, width, height));
        self
    }
}

impl ImageResolver for FakeImages {
    fn dimensions(&self, reference: &str) -> Option<ImageDimensions> {
        self.images.get(reference).map(ImageObject::dimensions)
    }

    fn resolve(&self, reference: &str, size: ImageSize) -> Option<ImageObject> {
        let image = self.images.get(reference)?;
        Some(match size {
            ImageSize::Full => image.clone(),
            ImageSize::Bounded {
                max_width,
                max_height,
            } => {
                let scale = f64::min(
                    1.0,
                    f64::min(
                        f64::from(max_width) / f64::from(image.width),
                        f64::from(max_height) / f64::from(image.height),
                    ),
                );
                ImageObject::new(
                    image.url.clone(),
                    (f64::from(image.width) * scale) as u32,
                    (f64::from(image.height) * scale) as u32,
                )
            }
        })
    }
}

/// SEO front-end with fixed answers
#[derive(Default, Clone)]
pub struct FakeFrontend {
    pub canonical: Option<String>,
    pub description: Option<String>,
    pub og_image: Option<String>,
}

impl SeoFrontend for FakeFrontend {
    fn canonical_url(&self, _post: &PostContext) -> Option<String> {
        self.canonical.clone()
    }

    fn meta_description(&self, _post: &PostContext) -> Option<String> {
        self.description.clone()
    }

    fn opengraph_image(&self, _post: &PostContext) -> Option<String> {
        self.og_image.clone()
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Manager over an in-memory store with the built-in post types
pub struct MemoryFixture {
    pub store: Arc<MemoryOptionStore>,
    pub registry: Arc<StaticPostTypes>,
    pub manager: SettingsManager,
}

impl MemoryFixture {
    pub fn new() -> Self {
        Self::with_store(MemoryOptionStore::new())
    }

    pub fn with_store(store: MemoryOptionStore) -> Self {
        init_logging();
        let store = Arc::new(store);
        let registry = Arc::new(StaticPostTypes::builtin());
        let manager = SettingsManager::with_store("wpseo_amp", store.clone(), registry.clone());
        Self {
            store,
            registry,
            manager,
        }
    }
}

/// Manager writing JSON files into a temporary directory
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub registry: Arc<StaticPostTypes>,
    pub manager: SettingsManager,
}

impl TestFixture {
    pub fn new() -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let registry = Arc::new(StaticPostTypes::builtin());
        let config = SettingsConfig::builder("test-site")
            .config_dir(temp_dir.path())
            .build();
        let manager =
            SettingsManager::new(config, registry.clone()).expect("Failed to create manager");

        Self {
            temp_dir,
            registry,
            manager,
        }
    }

    /// Get the option file path
    pub fn option_path(&self) -> PathBuf {
        self.temp_dir.path().join("wpseo_amp.json")
    }

    /// Read the stored blob straight from disk
    pub fn read_option_file(&self) -> RawOptions {
        let content = std::fs::read_to_string(self.option_path()).expect("option file");
        serde_json::from_str(&content).expect("option file is a JSON object")
    }
}
