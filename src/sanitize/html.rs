//! Markup scanning, tag stripping and text escaping
//!
//! A `<` opens markup when it is followed by anything but whitespace, so
//! `a < b` stays text while `<b>`, `</b>`, `<!-- -->` and `<?x ?>` are all
//! markup. Inside markup, quoted attribute values are opaque and nested `<`
//! must be balanced before the closing `>`. Unterminated markup swallows the
//! rest of the input.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// An element without its closing tag runs to the end of the input
static SCRIPT_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b(?:[^>]*>.*?(?:</script\s*>|\z)|[^>]*\z)")
        .expect("script element pattern")
});

static STYLE_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b(?:[^>]*>.*?(?:</style\s*>|\z)|[^>]*\z)")
        .expect("style element pattern")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:([A-Za-z][A-Za-z0-9]*)|#[0-9]+|#[xX][0-9A-Fa-f]+);").expect("entity pattern")
});

/// Named entities left as they are when escaping (HTML 4 set)
const KNOWN_ENTITIES: &[&str] = &[
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect", "uml", "copy", "ordf",
    "laquo", "not", "shy", "reg", "macr", "deg", "plusmn", "acute", "micro", "para", "middot",
    "cedil", "ordm", "raquo", "iquest", "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring",
    "AElig", "Ccedil", "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml",
    "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times", "Oslash", "Ugrave",
    "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig", "agrave", "aacute", "acirc", "atilde",
    "auml", "aring", "aelig", "ccedil", "egrave", "eacute", "ecirc", "euml", "igrave", "iacute",
    "icirc", "iuml", "eth", "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide",
    "oslash", "ugrave", "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml", "quot", "amp", "lt",
    "gt", "apos", "OElig", "oelig", "Scaron", "scaron", "Yuml", "circ", "tilde", "ensp", "emsp",
    "thinsp", "zwnj", "zwj", "lrm", "rlm", "ndash", "mdash", "lsquo", "rsquo", "sbquo", "ldquo",
    "rdquo", "bdquo", "dagger", "Dagger", "permil", "lsaquo", "rsaquo", "euro", "fnof", "Alpha",
    "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa", "Lambda", "Mu",
    "Nu", "Xi", "Omicron", "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi", "Chi", "Psi", "Omega",
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa", "lambda",
    "mu", "nu", "xi", "omicron", "pi", "rho", "sigmaf", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega", "thetasym", "upsih", "piv", "bull", "hellip", "prime", "Prime", "oline",
    "frasl", "weierp", "image", "real", "trade", "alefsym", "larr", "uarr", "rarr", "darr", "harr",
    "crarr", "lArr", "uArr", "rArr", "dArr", "hArr", "forall", "part", "exist", "empty", "nabla",
    "isin", "notin", "ni", "prod", "sum", "minus", "lowast", "radic", "prop", "infin", "ang", "and",
    "or", "cap", "cup", "int", "sim", "cong", "asymp", "ne", "equiv", "le", "ge", "sub", "sup",
    "nsub", "sube", "supe", "oplus", "otimes", "perp", "sdot", "lceil", "rceil", "lfloor", "rfloor",
    "lang", "rang", "loz", "spades", "clubs", "hearts", "diams",
];

/// A piece of scanned input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain text between markup
    Text(&'a str),
    /// One markup token, verbatim
    Tag(Tag<'a>),
}

/// A markup token (element tag, comment, doctype or processing instruction)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag<'a> {
    /// Verbatim source, including `<` and `>` when present
    pub raw: &'a str,
    /// Lowercased element name; `None` for comments and declarations
    pub name: Option<String>,
    pub closing: bool,
    pub self_closing: bool,
}

impl Tag<'_> {
    /// Whether this token is an element in `allowed` (names compared case-insensitively)
    pub fn is_allowed(&self, allowed: &[&str]) -> bool {
        self.name
            .as_deref()
            .is_some_and(|name| allowed.iter().any(|a| a.eq_ignore_ascii_case(name)))
    }
}

/// Split `input` into text and markup segments
pub fn scan(input: &str) -> Vec<Segment<'_>> {
    let bytes = input.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'<' && opens_markup(bytes, i) {
            if text_start < i {
                segments.push(Segment::Text(&input[text_start..i]));
            }
            let end = markup_end(input, i);
            segments.push(Segment::Tag(parse_tag(&input[i..end])));
            i = end;
            text_start = end;
        } else {
            i += 1;
        }
    }

    if text_start < bytes.len() {
        segments.push(Segment::Text(&input[text_start..]));
    }
    segments
}

fn opens_markup(bytes: &[u8], at: usize) -> bool {
    bytes
        .get(at + 1)
        .is_some_and(|next| !next.is_ascii_whitespace())
}

/// Byte index just past the markup token starting at `start`
fn markup_end(input: &str, start: usize) -> usize {
    let rest = &input[start..];
    if rest.starts_with("<!--") {
        return match rest[4..].find("-->") {
            Some(pos) => start + 4 + pos + 3,
            None => input.len(),
        };
    }

    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    for (j, &b) in bytes.iter().enumerate().skip(start) {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' if depth > 0 && j > start + 1 => quote = Some(b),
            b'<' => depth += 1,
            b'>' => {
                depth -= 1;
                if depth == 0 {
                    return j + 1;
                }
            }
            _ => {}
        }
    }
    input.len()
}

fn parse_tag(raw: &str) -> Tag<'_> {
    let inner = &raw[1..];
    let closing = inner.starts_with('/');
    let name_part = inner.strip_prefix('/').unwrap_or(inner);
    let name: String = name_part
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'))
        .collect();
    let name = if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        None
    } else {
        Some(name.to_ascii_lowercase())
    };
    let self_closing = raw
        .strip_suffix('>')
        .is_some_and(|body| body.trim_end().ends_with('/'));

    Tag {
        raw,
        name,
        closing,
        self_closing,
    }
}

/// Remove every markup token except elements named in `allowed`
///
/// Text between tags is kept, so `<b>bold</b>` becomes `bold`.
pub fn strip_tags(input: &str, allowed: &[&str]) -> String {
    let mut out = String::with_capacity(input.len());
    for segment in scan(input) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Tag(tag) if tag.is_allowed(allowed) => out.push_str(tag.raw),
            Segment::Tag(_) => {}
        }
    }
    out
}

/// Remove `<script>` and `<style>` elements together with their bodies
pub fn remove_script_elements(input: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(input);
    loop {
        let pass = STYLE_ELEMENT
            .replace_all(&SCRIPT_ELEMENT.replace_all(&current, ""), "")
            .into_owned();
        if pass.len() == current.len() {
            return current;
        }
        current = Cow::Owned(pass);
    }
}

/// Decode bytes as UTF-8, replacing invalid sequences with U+FFFD
pub fn check_invalid_utf8(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}

/// Escape `&`, `<` and `>` for display, leaving quotes alone
///
/// Numeric entities (`&#38;`, `&#x26;`) and known named ones (`&amp;`,
/// `&copy;`) are not encoded a second time, which keeps the escaping
/// idempotent. Unknown names such as `&foo;` are escaped.
pub fn escape_specialchars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, c) in input.char_indices() {
        match c {
            '&' if is_entity(&input[i..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn is_entity(rest: &str) -> bool {
    match ENTITY.captures(rest) {
        Some(caps) => caps
            .get(1)
            .is_none_or(|name| KNOWN_ENTITIES.contains(&name.as_str())),
        None => false,
    }
}
