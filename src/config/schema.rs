//! Option schema: recognized keys, their classes, defaults and labels
//!
//! # Overview
//!
//! Every option key belongs to an [`OptionKind`] that decides how it is
//! sanitized. The schema also carries the display metadata the host UI
//! needs (label, description, category) as free-form metadata, the same way
//! for every key:
//!
//! ```rust
//! use ampglue::{OptionKind, SettingMetadata, schema};
//!
//! let schema = schema();
//! let header = &schema["header-color"];
//! assert_eq!(header.kind, OptionKind::Color);
//! assert_eq!(header.get_meta_str("label"), Some("AMP Header color"));
//! ```
//!
//! Per-post-type flags are not part of the static schema: their keys are
//! synthesized from the host's content-type registry (see
//! [`post_type_key`](crate::config::post_type_key)).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::settings::RawOptions;

/// Schema revision written to every sanitized blob
pub const CURRENT_VERSION: u64 = 1;

/// Option key names as they appear in the persisted blob
pub mod keys {
    pub const VERSION: &str = "version";
    pub const SITE_ICON: &str = "amp_site_icon";
    pub const DEFAULT_IMAGE: &str = "default_image";
    pub const HEADER_COLOR: &str = "header-color";
    pub const HEADINGS_COLOR: &str = "headings-color";
    pub const TEXT_COLOR: &str = "text-color";
    pub const META_COLOR: &str = "meta-color";
    pub const LINK_COLOR: &str = "link-color";
    pub const LINK_COLOR_HOVER: &str = "link-color-hover";
    pub const BLOCKQUOTE_TEXT_COLOR: &str = "blockquote-text-color";
    pub const BLOCKQUOTE_BG_COLOR: &str = "blockquote-bg-color";
    pub const BLOCKQUOTE_BORDER_COLOR: &str = "blockquote-border-color";
    pub const UNDERLINE: &str = "underline";
    pub const EXTRA_CSS: &str = "extra-css";
    pub const EXTRA_HEAD: &str = "extra-head";
    pub const ANALYTICS: &str = "analytics-extra";

    /// Prefix and suffix of synthesized per-post-type flag keys
    pub const POST_TYPE_PREFIX: &str = "post_types-";
    pub const POST_TYPE_SUFFIX: &str = "-amp";

    /// All hex color keys, in display order
    pub const COLORS: [&str; 9] = [
        HEADER_COLOR,
        HEADINGS_COLOR,
        TEXT_COLOR,
        META_COLOR,
        LINK_COLOR,
        LINK_COLOR_HOVER,
        BLOCKQUOTE_TEXT_COLOR,
        BLOCKQUOTE_BG_COLOR,
        BLOCKQUOTE_BORDER_COLOR,
    ];
}

/// Flag values stored for per-post-type keys
pub const FLAG_ON: &str = "on";
pub const FLAG_OFF: &str = "off";

/// Post type enabled by default
pub const DEFAULT_ENABLED_POST_TYPE: &str = "post";

/// Build the storage key of a post type flag (`post_types-<type>-amp`)
pub fn post_type_key(post_type: &str) -> String {
    format!(
        "{}{post_type}{}",
        keys::POST_TYPE_PREFIX,
        keys::POST_TYPE_SUFFIX
    )
}

/// Extract the post type from a flag key, if `key` is one
pub fn parse_post_type_key(key: &str) -> Option<&str> {
    key.strip_prefix(keys::POST_TYPE_PREFIX)?
        .strip_suffix(keys::POST_TYPE_SUFFIX)
        .filter(|name| !name.is_empty())
}

// =============================================================================
// Option Kinds
// =============================================================================

/// How an option is sanitized
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Schema revision, always forced to [`CURRENT_VERSION`]
    Version,
    /// Uploaded image reference (attachment id or URL)
    Image,
    /// `#rgb` / `#rrggbb`, empty otherwise
    Color,
    /// `underline` or `none`
    Underline,
    /// Stylesheet text shown as-is, never markup
    CssText,
    /// HTML restricted to `<link>` and `<meta>`
    HeadSnippet,
    /// `<amp-analytics>` wrapper around a JSON configuration
    Analytics,
    /// `on` / `off` switch for one post type
    PostTypeFlag,
}

// =============================================================================
// Setting Metadata
// =============================================================================

/// Metadata for a single option
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingMetadata {
    /// Sanitization class
    pub kind: OptionKind,

    /// Default value
    pub default: Value,

    /// Display metadata (label, description, category, ...)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, Value>,
}

impl SettingMetadata {
    fn with_kind(kind: OptionKind, default: Value, label: &str) -> Self {
        Self {
            kind,
            default,
            metadata: HashMap::new(),
        }
        .meta_str("label", label)
    }

    pub fn version() -> Self {
        Self::with_kind(OptionKind::Version, json!(CURRENT_VERSION), "Version")
    }

    pub fn image(label: &str) -> Self {
        Self::with_kind(OptionKind::Image, json!(""), label).category("design")
    }

    pub fn color(label: &str) -> Self {
        Self::with_kind(OptionKind::Color, json!(""), label).category("design")
    }

    pub fn underline(label: &str) -> Self {
        Self::with_kind(OptionKind::Underline, json!("underline"), label)
            .category("design")
            .meta("choices", json!({"underline": "Enabled", "none": "Disabled"}))
    }

    pub fn css(label: &str) -> Self {
        Self::with_kind(OptionKind::CssText, json!(""), label).category("advanced")
    }

    pub fn head_snippet(label: &str) -> Self {
        Self::with_kind(OptionKind::HeadSnippet, json!(""), label).category("advanced")
    }

    pub fn analytics(label: &str) -> Self {
        Self::with_kind(OptionKind::Analytics, json!(""), label).category("analytics")
    }

    /// Flag for one post type; only `post` is on by default
    pub fn post_type_flag(post_type: &str, label: &str) -> Self {
        let default = if post_type == DEFAULT_ENABLED_POST_TYPE {
            FLAG_ON
        } else {
            FLAG_OFF
        };
        Self::with_kind(OptionKind::PostTypeFlag, json!(default), label)
            .category("post_types")
            .meta("choices", json!({"on": "Enabled", "off": "Disabled"}))
    }

    // =========================================================================
    // Dynamic metadata methods
    // =========================================================================

    #[must_use]
    pub fn meta_str(mut self, key: &str, value: impl Into<String>) -> Self {
        self.metadata
            .insert(key.to_string(), Value::String(value.into()));
        self
    }

    #[must_use]
    pub fn meta(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    #[must_use]
    pub fn description(self, text: &str) -> Self {
        self.meta_str("description", text)
    }

    #[must_use]
    pub fn category(self, category: &str) -> Self {
        self.meta_str("category", category)
    }

    pub fn get_meta(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn get_meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Macro for building schema `HashMap`s
///
/// # Example
/// ```rust
/// use ampglue::{settings, SettingMetadata};
///
/// let extra = settings! {
///     "footer-color" => SettingMetadata::color("Footer color"),
/// };
/// assert!(extra.contains_key("footer-color"));
/// ```
#[macro_export]
macro_rules! settings {
    ($($key:expr => $value:expr),* $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), $value);
        )*
        map
    }};
}

static SCHEMA: LazyLock<HashMap<String, SettingMetadata>> = LazyLock::new(|| {
    settings! {
        keys::VERSION => SettingMetadata::version(),

        keys::SITE_ICON => SettingMetadata::image("AMP icon")
            .description("Must be at least 32px × 32px"),
        keys::DEFAULT_IMAGE => SettingMetadata::image("Default image")
            .description("The image must be at least 696px wide."),

        keys::HEADER_COLOR => SettingMetadata::color("AMP Header color"),
        keys::HEADINGS_COLOR => SettingMetadata::color("Title color"),
        keys::TEXT_COLOR => SettingMetadata::color("Text color"),
        keys::META_COLOR => SettingMetadata::color("Post meta info color"),
        keys::LINK_COLOR => SettingMetadata::color("Link text color"),
        keys::LINK_COLOR_HOVER => SettingMetadata::color("Link hover color"),
        keys::BLOCKQUOTE_TEXT_COLOR => SettingMetadata::color("Blockquote text color"),
        keys::BLOCKQUOTE_BG_COLOR => SettingMetadata::color("Blockquote background color"),
        keys::BLOCKQUOTE_BORDER_COLOR => SettingMetadata::color("Blockquote border color"),

        keys::UNDERLINE => SettingMetadata::underline("Link underline"),

        keys::EXTRA_CSS => SettingMetadata::css("Extra CSS"),
        keys::EXTRA_HEAD => SettingMetadata::head_snippet("Extra code in <head>")
            .description("Only <link> and <meta> tags are allowed"),

        keys::ANALYTICS => SettingMetadata::analytics("Analytics code")
            .description("Optionally add a valid google analytics tracking code."),
    }
});

/// The static option schema (post type flags excluded)
pub fn schema() -> HashMap<String, SettingMetadata> {
    SCHEMA.clone()
}

/// Compiled-in defaults for every static key
pub fn defaults() -> RawOptions {
    SCHEMA
        .iter()
        .map(|(key, meta)| (key.clone(), meta.default.clone()))
        .collect()
}

/// Kind of an arbitrary key, including synthesized post type flags
pub fn kind_of(key: &str) -> Option<OptionKind> {
    if key.starts_with(keys::POST_TYPE_PREFIX) {
        return Some(OptionKind::PostTypeFlag);
    }
    SCHEMA.get(key).map(|meta| meta.kind)
}

// =============================================================================
// Tests
// =============================================================================
