//! Character encoding detection and normalization.
//!
//! Two jobs: decoding downloaded page bytes into UTF-8, and normalizing
//! extracted strings whose bytes were decoded with the wrong charset along
//! the way. Neither operation fails; when nothing can be detected the input
//! comes back unchanged.

use std::borrow::Cow;
use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use regex::Regex;

/// Match `<meta charset="...">` tag
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/;]+)"#).expect("valid regex")
});

/// Match `<meta http-equiv="Content-Type" content="...; charset=...">` tag
#[allow(clippy::expect_used)]
static CONTENT_TYPE_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Match `charset=` inside a `Content-Type` header value
#[allow(clippy::expect_used)]
static HEADER_CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).expect("valid regex"));

/// Bytes inspected for charset declarations.
const DECLARATION_WINDOW: usize = 4096;

/// Detect the character encoding of downloaded HTML.
///
/// Checked in order, first hit wins:
/// 1. Byte order mark
/// 2. `charset` parameter of the `Content-Type` header
/// 3. `<meta charset="...">`
/// 4. `<meta http-equiv="Content-Type" content="...; charset=...">`
/// 5. `chardetng` statistical guess over the declaration window
#[must_use]
pub fn detect_encoding(html: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }

    if let Some(encoding) = content_type
        .and_then(|ct| first_capture(&HEADER_CHARSET_RE, ct))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
    {
        return encoding;
    }

    let head = &html[..html.len().min(DECLARATION_WINDOW)];
    let head_str = String::from_utf8_lossy(head);

    for re in [&*CHARSET_META_RE, &*CONTENT_TYPE_CHARSET_RE] {
        if let Some(encoding) = first_capture(re, &head_str).and_then(|label| Encoding::for_label(label.as_bytes())) {
            return encoding;
        }
    }

    if std::str::from_utf8(html).is_ok() {
        return UTF_8;
    }

    let mut detector = EncodingDetector::new();
    detector.feed(head, head.len() == html.len());
    detector.guess(None, true)
}

fn first_capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcode downloaded HTML bytes to a UTF-8 string.
///
/// Detects the encoding with [`detect_encoding`] and decodes lossily:
/// undecodable sequences become U+FFFD instead of failing.
#[must_use]
pub fn transcode_to_utf8(html: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(html, content_type);
    tracing::trace!(encoding = encoding.name(), "transcoding page body");

    // decode() also strips a BOM matching the encoding
    let (decoded, _encoding_used, _had_errors) = encoding.decode(html);
    decoded.into_owned()
}

/// Normalize extracted text to canonical UTF-8.
///
/// Source encodings are tried in priority order:
/// 1. The text is already correct UTF-8 and is returned as is (minus a
///    leading byte order mark).
/// 2. The text is UTF-8 that was decoded as windows-1252 somewhere upstream
///    ("CafÃ©"). It is repaired when it re-encodes losslessly to
///    windows-1252 bytes that form valid multi-byte UTF-8.
///
/// Anything else comes back unchanged.
#[must_use]
pub fn normalize(text: &str) -> Cow<'_, str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if text.is_ascii() {
        return Cow::Borrowed(text);
    }

    match repair_mojibake(text) {
        Some(repaired) => {
            tracing::debug!("text was double-encoded UTF-8; repaired");
            Cow::Owned(repaired)
        }
        None => Cow::Borrowed(text),
    }
}

fn repair_mojibake(text: &str) -> Option<String> {
    let (bytes, _, unmappable) = WINDOWS_1252.encode(text);
    if unmappable {
        return None;
    }
    // every non-ASCII char must become part of a multi-byte sequence
    let repaired = std::str::from_utf8(&bytes).ok()?;
    (repaired != text).then(|| repaired.to_string())
}
