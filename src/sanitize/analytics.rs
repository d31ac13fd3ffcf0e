//! `<amp-analytics>` snippet parsing
//!
//! A snippet is accepted when its text content is a JSON document and the
//! markup holds exactly one `<amp-analytics>` element wrapping that text.
//! Everything else about the submitted markup is discarded: the stored form
//! is always rebuilt from the wrapper's opening tag and the JSON text.

use super::html::{Segment, scan, strip_tags};
use log::debug;
use serde_json::Value;
use std::fmt;

/// Element wrapping the analytics configuration
pub const WRAPPER_TAG: &str = "amp-analytics";

/// AMP runtime component needed to render the wrapper
pub const AMP_ANALYTICS_SCRIPT: &str = "https://cdn.ampproject.org/v0/amp-analytics-0.1.js";

/// Why a snippet was discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyticsRejection {
    /// Text content is not JSON (or is `null`)
    InvalidJson,
    /// No opening and closing `<amp-analytics>` pair
    MissingWrapper,
    /// More than one wrapper element
    MultipleWrappers,
    /// `<amp-analytics/>` cannot hold a payload
    SelfClosingWrapper,
    /// Text found before the opening or after the closing tag
    PayloadOutsideWrapper,
}

impl fmt::Display for AnalyticsRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::InvalidJson => "configuration is not valid JSON",
            Self::MissingWrapper => "missing <amp-analytics> element",
            Self::MultipleWrappers => "more than one <amp-analytics> element",
            Self::SelfClosingWrapper => "self-closing <amp-analytics> element",
            Self::PayloadOutsideWrapper => "configuration outside <amp-analytics> element",
        };
        f.write_str(reason)
    }
}

/// Structured form of an accepted snippet
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsSnippet {
    open_tag: String,
    payload: String,
    config: Value,
}

impl AnalyticsSnippet {
    /// Parse submitted markup
    ///
    /// # Errors
    ///
    /// Returns the first structural problem found.
    pub fn parse(raw: &str) -> Result<Self, AnalyticsRejection> {
        let text = strip_tags(raw, &[]);
        let payload = text.trim();
        let config: Value =
            serde_json::from_str(payload).map_err(|_| AnalyticsRejection::InvalidJson)?;
        if config.is_null() {
            return Err(AnalyticsRejection::InvalidJson);
        }

        let wrapped = strip_tags(raw, &[WRAPPER_TAG]);
        let segments = scan(&wrapped);

        let mut open = None;
        let mut close = None;
        for (index, segment) in segments.iter().enumerate() {
            let Segment::Tag(tag) = segment else {
                continue;
            };
            let slot = if tag.closing { &mut close } else { &mut open };
            if slot.is_some() {
                return Err(AnalyticsRejection::MultipleWrappers);
            }
            *slot = Some((index, tag));
        }

        let (Some((open_at, open_tag)), Some((close_at, _))) = (open, close) else {
            return Err(match open {
                Some((_, tag)) if tag.self_closing => AnalyticsRejection::SelfClosingWrapper,
                _ => AnalyticsRejection::MissingWrapper,
            });
        };
        if open_tag.self_closing {
            return Err(AnalyticsRejection::SelfClosingWrapper);
        }
        if close_at < open_at {
            return Err(AnalyticsRejection::MissingWrapper);
        }

        let mut outside = segments[..open_at].iter().chain(&segments[close_at + 1..]);
        let stray_text = outside.any(|segment| match segment {
            Segment::Text(text) => !text.trim().is_empty(),
            Segment::Tag(_) => false,
        });
        if stray_text {
            return Err(AnalyticsRejection::PayloadOutsideWrapper);
        }

        Ok(Self {
            open_tag: open_tag.raw.to_string(),
            payload: payload.to_string(),
            config,
        })
    }

    /// Opening wrapper tag with its attributes, verbatim
    pub fn open_tag(&self) -> &str {
        &self.open_tag
    }

    /// JSON configuration as submitted (trimmed)
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Parsed configuration
    pub fn config(&self) -> &Value {
        &self.config
    }

    /// Markup stored for the renderer
    pub fn render(&self) -> String {
        format!(
            "{}<script type=\"application/json\">{}</script></{WRAPPER_TAG}>",
            self.open_tag, self.payload
        )
    }
}

/// Clean an analytics snippet, discarding it entirely when it is malformed
pub fn validate_analytics_snippet(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    match AnalyticsSnippet::parse(raw) {
        Ok(snippet) => snippet.render(),
        Err(reason) => {
            debug!("Discarding analytics snippet: {reason}");
            String::new()
        }
    }
}
