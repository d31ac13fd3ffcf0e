// Save a settings form and enrich AMP page metadata with the result
//
// Run with: cargo run --example save_and_render

use ampglue::metadata::{ImageObject, ImageResolver, ImageSize, SeoFrontend, SeoOptions};
use ampglue::validate::ImageDimensions;
use ampglue::{
    MemoryOptionStore, MetadataEnricher, PageMetadata, PostContext, SettingsManager,
    StaticPostTypes,
};
use serde_json::json;
use std::sync::Arc;

struct Media;

impl ImageResolver for Media {
    fn dimensions(&self, reference: &str) -> Option<ImageDimensions> {
        match reference {
            "12" => Some(ImageDimensions::new(16, 16)),
            "34" => Some(ImageDimensions::new(1200, 675)),
            _ => None,
        }
    }

    fn resolve(&self, reference: &str, _size: ImageSize) -> Option<ImageObject> {
        let size = self.dimensions(reference)?;
        Some(ImageObject::new(
            format!("https://example.com/uploads/{reference}.png"),
            size.width,
            size.height,
        ))
    }
}

struct Frontend;

impl SeoFrontend for Frontend {
    fn canonical_url(&self, post: &PostContext) -> Option<String> {
        Some(format!("https://example.com/?p={}", post.id))
    }

    fn meta_description(&self, _post: &PostContext) -> Option<String> {
        Some("Release notes for the spring update".to_string())
    }

    fn opengraph_image(&self, _post: &PostContext) -> Option<String> {
        None
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let registry = StaticPostTypes::builtin().with("product", "Products");
    let manager = SettingsManager::builder("save-and-render")
        .with_store(Arc::new(MemoryOptionStore::new()))
        .with_registry(Arc::new(registry))
        .with_image_resolver(Arc::new(Media))
        .build()?;

    manager.events().on_change(|key, old, new| {
        println!("  changed {key}: {old} -> {new}");
    });

    let form = json!({
        "amp_site_icon": "12",
        "default_image": "34",
        "header-color": "#1E73BE",
        "link-color": "blue",
        "extra-head": "<meta name=\"theme-color\" content=\"#1e73be\"><script>track()</script>",
        "analytics-extra": "<amp-analytics type=\"googleanalytics\"><script type=\"application/json\">{\"vars\":{\"account\":\"UA-XXXXX-Y\"}}</script></amp-analytics>",
        "post_types-product-amp": "on",
    });
    let form = form.as_object().ok_or("form must be an object")?;

    println!("Advisory checks:");
    for (key, validity) in manager.validate_submission(form) {
        for issue in validity.issues() {
            println!("  {key}: {issue}");
        }
    }

    println!("Saving:");
    let settings = manager.save(form)?;

    println!("Post types:");
    for toggle in manager.post_type_toggles()? {
        let state = if toggle.enabled { "on" } else { "off" };
        println!("  {:<12} {state}", toggle.label);
    }

    let seo = SeoOptions {
        company_name: "Example Co".to_string(),
        company_logo: String::new(),
    };
    let enricher = MetadataEnricher::new(&settings, &seo, &Frontend, &Media);
    let meta = enricher.merge(PageMetadata::default(), &PostContext::new(42, "post"));

    println!("Metadata:");
    println!("{}", serde_json::to_string_pretty(&meta)?);
    Ok(())
}
