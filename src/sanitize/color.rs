//! Hex colors and the link underline switch

use regex::Regex;
use std::sync::LazyLock;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{6}|[0-9A-Fa-f]{3})$").expect("hex color pattern")
});

/// Underline values
pub const UNDERLINE: &str = "underline";
pub const NO_UNDERLINE: &str = "none";

/// Return `color` when it is `#rgb` or `#rrggbb`, `default` otherwise
pub fn sanitize_hex_color(color: &str, default: &str) -> String {
    if HEX_COLOR.is_match(color) {
        color.to_string()
    } else {
        default.to_string()
    }
}

/// Keep `underline`, turn anything else into `none`
pub fn sanitize_link_underline(input: &str) -> &'static str {
    if input == UNDERLINE {
        UNDERLINE
    } else {
        NO_UNDERLINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_colors() {
        assert_eq!(sanitize_hex_color("#fff", ""), "#fff");
        assert_eq!(sanitize_hex_color("#A1b2C3", ""), "#A1b2C3");
    }

    #[test]
    fn test_invalid_colors_fall_back() {
        for input in ["red", "#ffff", "fff", "#ggg", " #fff", "#fff ", "#1234567", ""] {
            assert_eq!(sanitize_hex_color(input, ""), "", "{input:?}");
        }
        assert_eq!(sanitize_hex_color("red", "#000"), "#000");
    }

    #[test]
    fn test_underline() {
        assert_eq!(sanitize_link_underline("underline"), "underline");
        assert_eq!(sanitize_link_underline("none"), "none");
        assert_eq!(sanitize_link_underline("Underline"), "none");
        assert_eq!(sanitize_link_underline(""), "none");
    }
}
