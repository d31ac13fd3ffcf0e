//! Metadata Merge Integration Tests
//!
//! Tests for enriching renderer metadata from stored settings:
//! - Template data (canonical URL, site icon, component scripts)
//! - Publisher, description, image fallbacks and `@type`
//! - The render hook and JSON output shape

mod common;

use ampglue::metadata::{ImageObject, SeoOptions};
use ampglue::{MetadataEnricher, PageMetadata, PostContext, RenderHook};
use common::{FakeFrontend, FakeImages, MemoryFixture, raw};
use serde_json::json;

fn images() -> FakeImages {
    FakeImages::new()
        .with("https://example.com/logo.png", "https://example.com/logo.png", 1200, 240)
        .with("55", "https://example.com/default.jpg", 1200, 800)
        .with("77", "https://example.com/og.jpg", 1200, 630)
        .with("9", "https://example.com/icon.png", 512, 512)
}

fn seo() -> SeoOptions {
    SeoOptions {
        company_name: "Acme Inc.".into(),
        company_logo: "https://example.com/logo.png".into(),
    }
}

#[test]
fn test_merge_from_saved_settings() {
    let fixture = MemoryFixture::new();
    let settings = fixture
        .manager
        .save(&raw(json!({
            "amp_site_icon": "9",
            "default_image": "55",
            "analytics-extra": "<amp-analytics type=\"googleanalytics\">{\"vars\":{\"account\":\"UA-1\"}}</amp-analytics>",
        })))
        .unwrap();

    let frontend = FakeFrontend {
        canonical: Some("https://example.com/hello-world/".into()),
        description: Some("A friendly greeting".into()),
        og_image: None,
    };
    let images = images();
    let seo = seo();
    let enricher = MetadataEnricher::new(&settings, &seo, &frontend, &images);

    let meta = enricher.merge(PageMetadata::default(), &PostContext::new(1, "post"));

    assert_eq!(meta.canonical_url.as_deref(), Some("https://example.com/hello-world/"));
    assert_eq!(meta.site_icon_url.as_deref(), Some("https://example.com/icon.png"));
    assert_eq!(
        meta.amp_component_scripts.get("amp-analytics").map(String::as_str),
        Some("https://cdn.ampproject.org/v0/amp-analytics-0.1.js")
    );
    assert_eq!(meta.publisher.name.as_deref(), Some("Acme Inc."));
    assert_eq!(
        meta.publisher.logo,
        Some(ImageObject::new("https://example.com/logo.png", 300, 60))
    );
    assert_eq!(meta.description.as_deref(), Some("A friendly greeting"));
    assert_eq!(
        meta.image.as_ref().map(|image| image.url.as_str()),
        Some("https://example.com/default.jpg")
    );
    assert_eq!(meta.schema_type.as_deref(), Some("Article"));
}

#[test]
fn test_og_image_wins_over_existing() {
    let fixture = MemoryFixture::new();
    let settings = fixture.manager.settings().unwrap();
    let frontend = FakeFrontend {
        og_image: Some("77".into()),
        ..FakeFrontend::default()
    };
    let images = images();
    let seo = SeoOptions::default();

    let existing = PageMetadata {
        image: Some(ImageObject::new("https://example.com/featured.jpg", 900, 600)),
        ..PageMetadata::default()
    };
    let meta = MetadataEnricher::new(&settings, &seo, &frontend, &images)
        .merge(existing, &PostContext::new(2, "page"));

    assert_eq!(meta.image.unwrap().url, "https://example.com/og.jpg");
    assert_eq!(meta.schema_type.as_deref(), Some("WebPage"));
}

#[test]
fn test_unresolvable_default_image_leaves_image_empty() {
    let fixture = MemoryFixture::new();
    let settings = fixture
        .manager
        .save_setting("default_image", json!("404"))
        .unwrap();
    let frontend = FakeFrontend::default();
    let images = images();
    let seo = SeoOptions::default();

    let meta = MetadataEnricher::new(&settings, &seo, &frontend, &images)
        .merge(PageMetadata::default(), &PostContext::new(3, "post"));
    assert!(meta.image.is_none());
    assert!(meta.canonical_url.is_none());
    assert!(meta.site_icon_url.is_none());
    assert!(meta.amp_component_scripts.is_empty());
}

#[test]
fn test_render_hook_and_filter() {
    let fixture = MemoryFixture::new();
    let settings = fixture.manager.settings().unwrap();
    let frontend = FakeFrontend::default();
    let images = images();
    let seo = seo();

    let enricher = MetadataEnricher::new(&settings, &seo, &frontend, &images)
        .with_schema_type_filter(|computed, post| {
            if post.post_type == "product" {
                "Product".into()
            } else {
                computed.into()
            }
        });
    let hook: &dyn RenderHook = &enricher;

    let meta = hook.on_render_metadata(PageMetadata::default(), &PostContext::new(4, "product"));
    assert_eq!(meta.schema_type.as_deref(), Some("Product"));
}

#[test]
fn test_renderer_fields_survive_merge() {
    let fixture = MemoryFixture::new();
    let settings = fixture.manager.settings().unwrap();
    let frontend = FakeFrontend::default();
    let images = images();
    let seo = seo();

    let incoming: PageMetadata = serde_json::from_value(json!({
        "@type": "BlogPosting",
        "headline": "Hello world",
        "datePublished": "2024-01-01T00:00:00+00:00",
        "publisher": {"@type": "Organization", "name": "Blog name"},
    }))
    .unwrap();

    let meta = MetadataEnricher::new(&settings, &seo, &frontend, &images)
        .merge(incoming, &PostContext::new(5, "post"));
    let out = serde_json::to_value(&meta).unwrap();

    assert_eq!(out["@type"], json!("Article"));
    assert_eq!(out["headline"], json!("Hello world"));
    assert_eq!(out["datePublished"], json!("2024-01-01T00:00:00+00:00"));
    assert_eq!(out["publisher"]["@type"], json!("Organization"));
    assert_eq!(out["publisher"]["name"], json!("Acme Inc."));
    assert_eq!(out["publisher"]["logo"]["@type"], json!("ImageObject"));
    assert_eq!(out["publisher"]["logo"]["height"], json!(60));
}
