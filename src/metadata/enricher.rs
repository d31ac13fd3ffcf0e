//! Metadata enrichment for AMP pages

use super::{
    ImageObject, ImageResolver, ImageSize, PUBLISHER_LOGO_SIZE, PageMetadata, PostContext,
    SeoFrontend, SeoOptions,
};
use crate::events::RenderHook;
use crate::sanitize::{AMP_ANALYTICS_SCRIPT, WRAPPER_TAG};
use crate::settings::AmpSettings;
use log::debug;
use std::sync::Arc;

/// Hook replacing the computed `@type`; receives the computed type and the page
pub type SchemaTypeFilter = Arc<dyn Fn(&str, &PostContext) -> String + Send + Sync>;

/// Merges stored settings and SEO values into renderer metadata
///
/// # Example
///
/// ```rust
/// use ampglue::metadata::{
///     ImageObject, ImageResolver, ImageSize, MetadataEnricher, PageMetadata, PostContext,
///     SeoFrontend, SeoOptions,
/// };
/// use ampglue::validate::ImageDimensions;
/// use ampglue::AmpSettings;
///
/// struct NoImages;
/// impl ImageResolver for NoImages {
///     fn dimensions(&self, _: &str) -> Option<ImageDimensions> { None }
///     fn resolve(&self, _: &str, _: ImageSize) -> Option<ImageObject> { None }
/// }
///
/// struct Front;
/// impl SeoFrontend for Front {
///     fn canonical_url(&self, _: &PostContext) -> Option<String> {
///         Some("https://example.com/hello/".into())
///     }
///     fn meta_description(&self, _: &PostContext) -> Option<String> { None }
///     fn opengraph_image(&self, _: &PostContext) -> Option<String> { None }
/// }
///
/// let settings = AmpSettings::default();
/// let seo = SeoOptions::default();
/// let enricher = MetadataEnricher::new(&settings, &seo, &Front, &NoImages);
///
/// let meta = enricher.merge(PageMetadata::default(), &PostContext::new(1, "post"));
/// assert_eq!(meta.schema_type.as_deref(), Some("Article"));
/// assert_eq!(meta.canonical_url.as_deref(), Some("https://example.com/hello/"));
/// ```
pub struct MetadataEnricher<'a> {
    settings: &'a AmpSettings,
    seo: &'a SeoOptions,
    frontend: &'a dyn SeoFrontend,
    images: &'a dyn ImageResolver,
    schema_type_filter: Option<SchemaTypeFilter>,
}

impl<'a> MetadataEnricher<'a> {
    pub fn new(
        settings: &'a AmpSettings,
        seo: &'a SeoOptions,
        frontend: &'a dyn SeoFrontend,
        images: &'a dyn ImageResolver,
    ) -> Self {
        Self {
            settings,
            seo,
            frontend,
            images,
            schema_type_filter: None,
        }
    }

    /// Let the host override the `@type` per page
    pub fn with_schema_type_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str, &PostContext) -> String + Send + Sync + 'static,
    {
        self.schema_type_filter = Some(Arc::new(filter));
        self
    }

    /// Enrich `meta` for `post`
    pub fn merge(&self, mut meta: PageMetadata, post: &PostContext) -> PageMetadata {
        self.apply_template_data(&mut meta, post);
        self.apply_post_metadata(&mut meta, post);
        meta
    }

    /// `Article` for posts, `WebPage` for anything else, then the filter
    pub fn schema_type(&self, post: &PostContext) -> String {
        let computed = if post.post_type == "post" {
            "Article"
        } else {
            "WebPage"
        };
        match &self.schema_type_filter {
            Some(filter) => filter(computed, post),
            None => computed.to_string(),
        }
    }

    fn apply_template_data(&self, meta: &mut PageMetadata, post: &PostContext) {
        if let Some(canonical) = self.frontend.canonical_url(post) {
            meta.canonical_url = Some(canonical);
        }

        let icon = &self.settings.site_icon;
        if !icon.is_empty() {
            let url = self
                .images
                .resolve(icon, ImageSize::Full)
                .map_or_else(|| icon.clone(), |image| image.url);
            meta.site_icon_url = Some(url);
        }

        if self.settings.has_analytics() {
            meta.amp_component_scripts
                .insert(WRAPPER_TAG.to_string(), AMP_ANALYTICS_SCRIPT.to_string());
        }
    }

    fn apply_post_metadata(&self, meta: &mut PageMetadata, post: &PostContext) {
        if !self.seo.company_name.is_empty() {
            meta.publisher.name = Some(self.seo.company_name.clone());
        }
        if let Some(logo) = self.image_object(&self.seo.company_logo, PUBLISHER_LOGO_SIZE) {
            meta.publisher.logo = Some(logo);
        }

        let description = self
            .frontend
            .meta_description(post)
            .filter(|description| !description.is_empty());
        if description.is_some() {
            meta.description = description;
        }

        meta.image = self.page_image(meta.image.take(), post);
        meta.schema_type = Some(self.schema_type(post));
    }

    /// Open Graph image first, then the default image when the page has none
    fn page_image(&self, current: Option<ImageObject>, post: &PostContext) -> Option<ImageObject> {
        let og_image = self
            .frontend
            .opengraph_image(post)
            .and_then(|reference| self.image_object(&reference, ImageSize::Full));
        if og_image.is_some() {
            return og_image;
        }

        if current.is_none() && !self.settings.default_image.is_empty() {
            debug!("Post {} has no image, using the default image", post.id);
            return self.image_object(&self.settings.default_image, ImageSize::Full);
        }

        current
    }

    fn image_object(&self, reference: &str, size: ImageSize) -> Option<ImageObject> {
        if reference.is_empty() {
            return None;
        }
        self.images.resolve(reference, size)
    }
}

impl RenderHook for MetadataEnricher<'_> {
    fn on_render_metadata(&self, meta: PageMetadata, post: &PostContext) -> PageMetadata {
        self.merge(meta, post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ImageDimensions;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Images(HashMap<String, ImageObject>);

    impl Images {
        fn with(mut self, reference: &str, image: ImageObject) -> Self {
            self.0.insert(reference.to_string(), image);
            self
        }
    }

    impl ImageResolver for Images {
        fn dimensions(&self, reference: &str) -> Option<ImageDimensions> {
            self.0.get(reference).map(ImageObject::dimensions)
        }

        fn resolve(&self, reference: &str, size: ImageSize) -> Option<ImageObject> {
            let mut image = self.0.get(reference)?.clone();
            if let ImageSize::Bounded { max_width, max_height } = size {
                image.width = image.width.min(max_width);
                image.height = image.height.min(max_height);
            }
            Some(image)
        }
    }

    #[derive(Default)]
    struct Front {
        description: Option<String>,
        og_image: Option<String>,
    }

    impl SeoFrontend for Front {
        fn canonical_url(&self, post: &PostContext) -> Option<String> {
            Some(format!("https://example.com/?p={}", post.id))
        }

        fn meta_description(&self, _post: &PostContext) -> Option<String> {
            self.description.clone()
        }

        fn opengraph_image(&self, _post: &PostContext) -> Option<String> {
            self.og_image.clone()
        }
    }

    #[test]
    fn test_schema_type() {
        let settings = AmpSettings::default();
        let seo = SeoOptions::default();
        let images = Images::default();
        let front = Front::default();
        let enricher = MetadataEnricher::new(&settings, &seo, &front, &images);

        assert_eq!(enricher.schema_type(&PostContext::new(1, "post")), "Article");
        assert_eq!(enricher.schema_type(&PostContext::new(1, "page")), "WebPage");

        let filtered = enricher.with_schema_type_filter(|computed, post| {
            if post.post_type == "recipe" {
                "Recipe".to_string()
            } else {
                computed.to_string()
            }
        });
        assert_eq!(filtered.schema_type(&PostContext::new(1, "recipe")), "Recipe");
        assert_eq!(filtered.schema_type(&PostContext::new(1, "post")), "Article");
    }

    #[test]
    fn test_publisher_and_scripts() {
        let mut settings = AmpSettings::default();
        settings.analytics =
            "<amp-analytics><script type=\"application/json\">{}</script></amp-analytics>"
                .into();
        let seo = SeoOptions {
            company_name: "Acme".into(),
            company_logo: "logo.png".into(),
        };
        let images = Images::default().with(
            "logo.png",
            ImageObject::new("https://cdn/logo.png", 1200, 300),
        );
        let front = Front::default();

        let meta = MetadataEnricher::new(&settings, &seo, &front, &images)
            .merge(PageMetadata::default(), &PostContext::new(7, "post"));

        assert_eq!(meta.publisher.name.as_deref(), Some("Acme"));
        let logo = meta.publisher.logo.unwrap();
        assert!(logo.width <= 600 && logo.height <= 60);
        assert_eq!(
            meta.amp_component_scripts.get("amp-analytics").map(String::as_str),
            Some(AMP_ANALYTICS_SCRIPT)
        );
        assert_eq!(meta.canonical_url.as_deref(), Some("https://example.com/?p=7"));
    }

    #[test]
    fn test_unresolvable_logo_is_omitted() {
        let settings = AmpSettings::default();
        let seo = SeoOptions {
            company_name: String::new(),
            company_logo: "missing.png".into(),
        };
        let images = Images::default();
        let front = Front::default();

        let meta = MetadataEnricher::new(&settings, &seo, &front, &images)
            .merge(PageMetadata::default(), &PostContext::new(1, "page"));
        assert!(meta.publisher.logo.is_none());
        assert!(meta.publisher.name.is_none());
        assert!(meta.amp_component_scripts.is_empty());
    }

    #[test]
    fn test_image_fallbacks() {
        let mut settings = AmpSettings::default();
        settings.default_image = "default.png".into();
        let seo = SeoOptions::default();
        let images = Images::default()
            .with("default.png", ImageObject::new("https://cdn/default.png", 696, 400))
            .with("og.png", ImageObject::new("https://cdn/og.png", 1200, 630));
        let post = PostContext::new(3, "post");

        let plain = Front::default();
        let enricher = MetadataEnricher::new(&settings, &seo, &plain, &images);
        let meta = enricher.merge(PageMetadata::default(), &post);
        assert_eq!(meta.image.unwrap().url, "https://cdn/default.png");

        let existing = PageMetadata {
            image: Some(ImageObject::new("https://cdn/own.png", 800, 600)),
            ..PageMetadata::default()
        };
        let meta = enricher.merge(existing.clone(), &post);
        assert_eq!(meta.image.unwrap().url, "https://cdn/own.png");

        let og = Front {
            og_image: Some("og.png".into()),
            ..Front::default()
        };
        let meta = MetadataEnricher::new(&settings, &seo, &og, &images).merge(existing, &post);
        assert_eq!(meta.image.unwrap().url, "https://cdn/og.png");
    }

    #[test]
    fn test_description_only_when_present() {
        let settings = AmpSettings::default();
        let seo = SeoOptions::default();
        let images = Images::default();
        let post = PostContext::new(1, "post");
        let original = PageMetadata {
            description: Some("renderer".into()),
            ..PageMetadata::default()
        };

        let empty = Front {
            description: Some(String::new()),
            ..Front::default()
        };
        let meta =
            MetadataEnricher::new(&settings, &seo, &empty, &images).merge(original.clone(), &post);
        assert_eq!(meta.description.as_deref(), Some("renderer"));

        let seo_desc = Front {
            description: Some("From SEO".into()),
            ..Front::default()
        };
        let meta =
            MetadataEnricher::new(&settings, &seo, &seo_desc, &images).merge(original, &post);
        assert_eq!(meta.description.as_deref(), Some("From SEO"));
    }

    #[test]
    fn test_site_icon_resolution() {
        let mut settings = AmpSettings::default();
        settings.site_icon = "12".into();
        let seo = SeoOptions::default();
        let front = Front::default();
        let post = PostContext::new(1, "post");

        let images = Images::default().with("12", ImageObject::new("https://cdn/icon.png", 64, 64));
        let meta = MetadataEnricher::new(&settings, &seo, &front, &images)
            .merge(PageMetadata::default(), &post);
        assert_eq!(meta.site_icon_url.as_deref(), Some("https://cdn/icon.png"));

        let none = Images::default();
        let meta = MetadataEnricher::new(&settings, &seo, &front, &none)
            .merge(PageMetadata::default(), &post);
        assert_eq!(meta.site_icon_url.as_deref(), Some("12"));
    }
}
