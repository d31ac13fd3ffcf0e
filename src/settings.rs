//! Typed settings and their flat storage form
//!
//! [`AmpSettings`] is the canonical in-memory value. It only becomes a flat
//! `key → value` object ([`RawOptions`]) at the storage boundary, where
//! per-post-type flags are spelled `post_types-<type>-amp: "on" | "off"`.
//! Keys outside the schema ride along untouched in [`AmpSettings::extra`].

use crate::config::{
    CURRENT_VERSION, DEFAULT_ENABLED_POST_TYPE, FLAG_OFF, FLAG_ON, keys, parse_post_type_key,
    post_type_key,
};
use crate::sanitize::sanitize_hex_color;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;

/// Flat option object as submitted or persisted
pub type RawOptions = serde_json::Map<String, Value>;

/// Render a raw option value as text
///
/// Numbers are written in decimal, `true` becomes `"1"`, and `false`, null
/// and structured values become empty.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

// =============================================================================
// Underline
// =============================================================================

/// Link underline style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Underline {
    #[default]
    Underline,
    None,
}

impl Underline {
    /// Only the exact string `underline` enables it
    pub fn from_option(value: &str) -> Self {
        if value == "underline" {
            Self::Underline
        } else {
            Self::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Underline => "underline",
            Self::None => "none",
        }
    }
}

impl fmt::Display for Underline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Colors
// =============================================================================

/// The design colors, indexed like [`keys::COLORS`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorScheme {
    values: [String; keys::COLORS.len()],
}

impl ColorScheme {
    fn index(key: &str) -> Option<usize> {
        keys::COLORS.iter().position(|k| *k == key)
    }

    /// Color stored under `key`, `None` for non-color keys
    pub fn get(&self, key: &str) -> Option<&str> {
        Self::index(key).map(|i| self.values[i].as_str())
    }

    /// Store `value` under `key`; returns `false` for non-color keys
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match Self::index(key) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        keys::COLORS
            .iter()
            .copied()
            .zip(self.values.iter().map(String::as_str))
    }
}

// =============================================================================
// Post type flags
// =============================================================================

/// AMP switch per post type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostTypeFlags(BTreeMap<String, bool>);

impl PostTypeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default switch state for a post type not seen before
    pub fn default_for(post_type: &str) -> bool {
        post_type == DEFAULT_ENABLED_POST_TYPE
    }

    pub fn get(&self, post_type: &str) -> Option<bool> {
        self.0.get(post_type).copied()
    }

    /// Unknown post types are disabled
    pub fn is_enabled(&self, post_type: &str) -> bool {
        self.get(post_type).unwrap_or(false)
    }

    pub fn set(&mut self, post_type: impl Into<String>, enabled: bool) {
        self.0.insert(post_type.into(), enabled);
    }

    /// Add `post_type` with its default state; returns whether it was missing
    pub fn insert_default(&mut self, post_type: &str) -> bool {
        if self.0.contains_key(post_type) {
            return false;
        }
        self.0
            .insert(post_type.to_string(), Self::default_for(post_type));
        true
    }

    pub fn contains(&self, post_type: &str) -> bool {
        self.0.contains_key(post_type)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(name, enabled)| (name.as_str(), *enabled))
    }

    /// Post types switched on
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter_map(|(name, enabled)| enabled.then_some(name))
    }
}

// =============================================================================
// AMP Settings
// =============================================================================

/// All options of the glue integration
#[derive(Debug, Clone, PartialEq)]
pub struct AmpSettings {
    pub version: u64,
    /// Site icon override (attachment id or URL)
    pub site_icon: String,
    /// Fallback image for posts without one (attachment id or URL)
    pub default_image: String,
    pub colors: ColorScheme,
    pub underline: Underline,
    pub extra_css: String,
    pub extra_head: String,
    /// Stored `<amp-analytics>` markup, empty when not configured
    pub analytics: String,
    pub post_types: PostTypeFlags,
    /// Keys outside the schema, kept as found
    pub extra: RawOptions,
}

impl Default for AmpSettings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            site_icon: String::new(),
            default_image: String::new(),
            colors: ColorScheme::default(),
            underline: Underline::default(),
            extra_css: String::new(),
            extra_head: String::new(),
            analytics: String::new(),
            post_types: PostTypeFlags::default(),
            extra: RawOptions::new(),
        }
    }
}

impl AmpSettings {
    /// Typed view over a stored blob
    ///
    /// Nothing is cleaned: values that do not fit their field read as the
    /// empty form (colors), `none` (underline) or off (flags). Schema keys
    /// missing from `raw` keep their defaults.
    pub fn from_raw(raw: &RawOptions) -> Self {
        let mut settings = Self::default();

        for (key, value) in raw {
            match key.as_str() {
                keys::VERSION => {
                    settings.version = value
                        .as_u64()
                        .or_else(|| value_text(value).trim().parse().ok())
                        .unwrap_or(CURRENT_VERSION);
                }
                keys::SITE_ICON => settings.site_icon = value_text(value),
                keys::DEFAULT_IMAGE => settings.default_image = value_text(value),
                keys::UNDERLINE => settings.underline = Underline::from_option(&value_text(value)),
                keys::EXTRA_CSS => settings.extra_css = value_text(value),
                keys::EXTRA_HEAD => settings.extra_head = value_text(value),
                keys::ANALYTICS => settings.analytics = value_text(value),
                other => {
                    if settings
                        .colors
                        .set(other, sanitize_hex_color(&value_text(value), ""))
                    {
                        continue;
                    }
                    match parse_post_type_key(other) {
                        Some(post_type) => settings
                            .post_types
                            .set(post_type, value_text(value) == FLAG_ON),
                        None => {
                            settings.extra.insert(other.to_string(), value.clone());
                        }
                    }
                }
            }
        }

        settings
    }

    /// Flatten into the storage form
    pub fn to_raw(&self) -> RawOptions {
        let mut raw = self.extra.clone();

        raw.insert(keys::VERSION.into(), json!(self.version));
        raw.insert(keys::SITE_ICON.into(), json!(self.site_icon));
        raw.insert(keys::DEFAULT_IMAGE.into(), json!(self.default_image));
        for (key, color) in self.colors.iter() {
            raw.insert(key.into(), json!(color));
        }
        raw.insert(keys::UNDERLINE.into(), json!(self.underline.as_str()));
        raw.insert(keys::EXTRA_CSS.into(), json!(self.extra_css));
        raw.insert(keys::EXTRA_HEAD.into(), json!(self.extra_head));
        raw.insert(keys::ANALYTICS.into(), json!(self.analytics));
        for (post_type, enabled) in self.post_types.iter() {
            let flag = if enabled { FLAG_ON } else { FLAG_OFF };
            raw.insert(post_type_key(post_type), json!(flag));
        }

        raw
    }

    /// Color under one of [`keys::COLORS`]
    pub fn color(&self, key: &str) -> Option<&str> {
        self.colors.get(key)
    }

    /// Whether an analytics snippet is configured
    pub fn has_analytics(&self) -> bool {
        !self.analytics.is_empty()
    }

    /// Pass-through option by key
    pub fn extra_text(&self, key: &str) -> Option<String> {
        self.extra.get(key).map(value_text)
    }
}
