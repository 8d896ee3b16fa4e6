//! Text cleanup helpers shared by the extraction stages.

use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z][a-zA-Z0-9]{1,31});").expect("valid regex")
});

#[allow(clippy::expect_used)]
static HEADING_OR_PARAGRAPH_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?(h[1-6]|p)(\s[^>]*)?>").expect("valid regex"));

#[allow(clippy::expect_used)]
static ANY_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<[a-zA-Z/!?][^>]*>").expect("valid regex")
});

#[allow(clippy::expect_used)]
static MULTI_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("valid regex"));

#[allow(clippy::expect_used)]
static MULTI_NEWLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n+").expect("valid regex"));

/// Named entities recognised by [`decode_entities`].
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("amp", "&"),
    ("lt", "<"),
    ("gt", ">"),
    ("quot", "\""),
    ("apos", "'"),
    ("nbsp", "\u{a0}"),
    ("ndash", "\u{2013}"),
    ("mdash", "\u{2014}"),
    ("lsquo", "\u{2018}"),
    ("rsquo", "\u{2019}"),
    ("ldquo", "\u{201c}"),
    ("rdquo", "\u{201d}"),
    ("hellip", "\u{2026}"),
    ("copy", "\u{a9}"),
    ("reg", "\u{ae}"),
    ("trade", "\u{2122}"),
    ("laquo", "\u{ab}"),
    ("raquo", "\u{bb}"),
    ("euro", "\u{20ac}"),
    ("pound", "\u{a3}"),
    ("middot", "\u{b7}"),
    ("bull", "\u{2022}"),
];

/// Decode HTML character references in one pass.
///
/// Numeric references and the common named entities are replaced; anything
/// unrecognised is left as written. Decoding is not repeated, so `&amp;lt;`
/// becomes `&lt;`.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    ENTITY_RE
        .replace_all(s, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32).map(String::from)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32).map(String::from)
            } else {
                NAMED_ENTITIES
                    .iter()
                    .find(|(name, _)| *name == body)
                    .map(|(_, value)| (*value).to_string())
            };
            decoded.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Convert article HTML from the readability stage into plain text.
///
/// Heading and paragraph tags become line breaks, remaining markup is
/// stripped, entities are decoded, and whitespace is collapsed: tabs become
/// spaces, runs of spaces shrink to one, carriage returns become newlines and
/// runs of newlines shrink to one.
#[must_use]
pub fn html_fragment_to_text(html: &str) -> String {
    let text = HEADING_OR_PARAGRAPH_TAG_RE.replace_all(html, "\n");
    let text = ANY_TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text).replace('\t', " ");
    let text = MULTI_SPACE_RE.replace_all(&text, " ").replace('\r', "\n");
    MULTI_NEWLINE_RE.replace_all(&text, "\n").into_owned()
}

/// `Some(trimmed)` when the text has any non-whitespace content.
#[must_use]
pub fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
