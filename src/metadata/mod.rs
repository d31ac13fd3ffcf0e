//! Page metadata handed to the AMP renderer
//!
//! The renderer builds a [`PageMetadata`] for every AMP page and lets the
//! integration enrich it through [`MetadataEnricher`]. Fields the
//! integration does not know about are carried in `extra` so nothing the
//! renderer put there is lost.

mod enricher;

pub use enricher::{MetadataEnricher, SchemaTypeFilter};

use crate::validate::ImageDimensions;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON-LD type of resolved images
pub const IMAGE_OBJECT_TYPE: &str = "ImageObject";

/// Bounding box for the publisher logo
pub const PUBLISHER_LOGO_SIZE: ImageSize = ImageSize::Bounded {
    max_width: 600,
    max_height: 60,
};

/// The page being rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostContext {
    pub id: u64,
    pub post_type: String,
}

impl PostContext {
    pub fn new(id: u64, post_type: impl Into<String>) -> Self {
        Self {
            id,
            post_type: post_type.into(),
        }
    }
}

/// Requested rendition of an image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    #[default]
    Full,
    /// Largest rendition fitting the box
    Bounded { max_width: u32, max_height: u32 },
}

/// A resolved image in JSON-LD form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    pub kind: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl ImageObject {
    pub fn new(url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            kind: IMAGE_OBJECT_TYPE.to_string(),
            url: url.into(),
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

/// Organization publishing the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Publisher {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<ImageObject>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Metadata object of one AMP page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_icon_url: Option<String>,
    /// AMP component name to script URL
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub amp_component_scripts: BTreeMap<String, String>,
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageObject>,
    #[serde(default)]
    pub publisher: Publisher,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// Collaborators
// =============================================================================

/// Media library access
pub trait ImageResolver: Send + Sync {
    /// Pixel size of the referenced image, `None` when unknown
    fn dimensions(&self, reference: &str) -> Option<ImageDimensions>;

    /// Resolve a reference to an image object of the requested size
    fn resolve(&self, reference: &str, size: ImageSize) -> Option<ImageObject>;
}

/// SEO front-end values for a page
pub trait SeoFrontend {
    fn canonical_url(&self, post: &PostContext) -> Option<String>;
    fn meta_description(&self, post: &PostContext) -> Option<String>;
    /// Reference of the Open Graph image chosen for the page
    fn opengraph_image(&self, post: &PostContext) -> Option<String>;
}

/// Site-wide SEO options the enricher reads
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoOptions {
    #[serde(default)]
    pub company_name: String,
    /// Logo reference (attachment id or URL)
    #[serde(default)]
    pub company_logo: String,
}
