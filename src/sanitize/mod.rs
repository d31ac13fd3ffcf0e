//! Sanitize pipeline
//!
//! [`sanitize`] turns any raw submission into [`AmpSettings`]. It never
//! fails: invalid colors fall back to their default, malformed analytics
//! snippets are dropped, and markup is stripped down to what each field
//! allows. Running it on its own output changes nothing.

mod analytics;
mod color;
mod html;

pub use analytics::{
    AMP_ANALYTICS_SCRIPT, AnalyticsRejection, AnalyticsSnippet, WRAPPER_TAG,
    validate_analytics_snippet,
};
pub use color::{NO_UNDERLINE, UNDERLINE, sanitize_hex_color, sanitize_link_underline};
pub use html::{
    Segment, Tag, check_invalid_utf8, escape_specialchars, remove_script_elements, scan,
    strip_tags,
};

use crate::config::{CURRENT_VERSION, FLAG_OFF, FLAG_ON, OptionKind, kind_of, parse_post_type_key};
use crate::settings::{AmpSettings, RawOptions, Underline, value_text};
use log::debug;
use serde_json::Value;

/// Elements allowed in the extra `<head>` code
pub const ALLOWED_HEAD_TAGS: [&str; 2] = ["link", "meta"];

/// Clean display CSS: no markup, `&`, `<` and `>` escaped
pub fn sanitize_css(input: &str) -> String {
    escape_specialchars(&strip_tags(input, &[]))
}

/// [`sanitize_css`] for input that may not be valid UTF-8
pub fn sanitize_css_bytes(input: &[u8]) -> String {
    sanitize_css(&check_invalid_utf8(input))
}

/// Reduce head code to `<link>` and `<meta>` tags
pub fn sanitize_extra_head(input: &str) -> String {
    strip_tags(&remove_script_elements(input), &ALLOWED_HEAD_TAGS)
}

/// Trimmed textual image reference (attachment id or URL)
pub fn sanitize_image_reference(value: &Value) -> String {
    value_text(value).trim().to_string()
}

/// Clean a raw submission
///
/// `known_post_types` are the post types currently registered with the
/// host; any of them without a flag in `raw` gets its default flag.
pub fn sanitize<S: AsRef<str>>(raw: &RawOptions, known_post_types: &[S]) -> AmpSettings {
    let mut clean = AmpSettings::default();

    for (key, value) in raw {
        let Some(kind) = kind_of(key) else {
            clean.extra.insert(key.clone(), value.clone());
            continue;
        };

        match kind {
            OptionKind::Version => {}
            OptionKind::Image => {
                let reference = sanitize_image_reference(value);
                if key == crate::config::keys::SITE_ICON {
                    clean.site_icon = reference;
                } else {
                    clean.default_image = reference;
                }
            }
            OptionKind::Color => {
                let submitted = value_text(value);
                let color = sanitize_hex_color(&submitted, "");
                if color != submitted {
                    debug!("{key}: {submitted:?} is not a hex color, using default");
                }
                clean.colors.set(key, color);
            }
            OptionKind::Underline => {
                clean.underline =
                    Underline::from_option(sanitize_link_underline(&value_text(value)));
            }
            OptionKind::CssText => clean.extra_css = sanitize_css(&value_text(value)),
            OptionKind::HeadSnippet => clean.extra_head = sanitize_extra_head(&value_text(value)),
            OptionKind::Analytics => {
                clean.analytics = validate_analytics_snippet(&value_text(value));
            }
            OptionKind::PostTypeFlag => {
                let enabled = value_text(value) == FLAG_ON;
                match parse_post_type_key(key) {
                    Some(post_type) => clean.post_types.set(post_type, enabled),
                    None => {
                        let flag = if enabled { FLAG_ON } else { FLAG_OFF };
                        clean.extra.insert(key.clone(), Value::from(flag));
                    }
                }
            }
        }
    }

    for post_type in known_post_types {
        clean.post_types.insert_default(post_type.as_ref());
    }

    clean.version = CURRENT_VERSION;
    clean
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawOptions {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_css_is_escaped_without_tags() {
        assert_eq!(
            sanitize_css("body{color:red}<script>x</script>"),
            "body{color:red}x"
        );
        assert_eq!(sanitize_css("a > b & c"), "a &gt; b &amp; c");
        assert_eq!(sanitize_css_bytes(b"p{}\xff"), "p{}\u{fffd}");
    }

    #[test]
    fn test_extra_head_keeps_link_and_meta() {
        assert_eq!(
            sanitize_extra_head(r#"<meta name="x"><script>alert(1)</script><b>hi</b>"#),
            r#"<meta name="x">hi"#
        );
    }

    #[test]
    fn test_extra_head_drops_hidden_script_bodies() {
        assert_eq!(
            sanitize_extra_head("<link rel=\"a\"><scr<script></script>ipt>evil()</script>"),
            "<link rel=\"a\">"
        );
        assert_eq!(
            sanitize_extra_head("<meta name=\"x\"><script>evil()"),
            "<meta name=\"x\">"
        );
    }

    #[test]
    fn test_sanitize_forces_version_and_defaults() {
        let clean = sanitize(&raw(json!({"version": 7})), &["post", "page"]);
        assert_eq!(clean.version, CURRENT_VERSION);
        assert_eq!(clean.underline, Underline::Underline);
        assert_eq!(clean.post_types.get("post"), Some(true));
        assert_eq!(clean.post_types.get("page"), Some(false));
        assert_eq!(clean.extra_css, "");
    }

    #[test]
    fn test_sanitize_field_classes() {
        let clean = sanitize(
            &raw(json!({
                "header-color": "red",
                "link-color": "#abc",
                "underline": "dotted",
                "amp_site_icon": 42,
                "default_image": "  https://example.com/a.png ",
                "post_types-page-amp": "yes",
                "post_types-legacy": "on",
                "company_name": "Acme",
            })),
            &["post"],
        );

        assert_eq!(clean.color("header-color"), Some(""));
        assert_eq!(clean.color("link-color"), Some("#abc"));
        assert_eq!(clean.underline, Underline::None);
        assert_eq!(clean.site_icon, "42");
        assert_eq!(clean.default_image, "https://example.com/a.png");
        assert_eq!(clean.post_types.get("page"), Some(false));
        assert_eq!(clean.post_types.get("post"), Some(true));
        assert_eq!(clean.extra.get("post_types-legacy"), Some(&json!("on")));
        assert_eq!(clean.extra.get("company_name"), Some(&json!("Acme")));
    }

    #[test]
    fn test_submitted_flag_beats_default() {
        let clean = sanitize(&raw(json!({"post_types-post-amp": "off"})), &["post"]);
        assert_eq!(clean.post_types.get("post"), Some(false));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = raw(json!({
            "extra-css": "a<b>&c</b> &amp; d > e",
            "extra-head": "<link rel=\"a\"><style>x</style><p>t</p>",
            "analytics-extra": "<amp-analytics type=\"x\">{\"a\":1}</amp-analytics>",
            "header-color": "#FFF",
            "underline": "none",
            "post_types-page-amp": "on",
        }));
        let once = sanitize(&input, &["post", "page"]);
        let twice = sanitize(&once.to_raw(), &["post", "page"]);
        assert_eq!(once, twice);
    }
}
