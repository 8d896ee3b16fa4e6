//! Result types for extraction output.
//!
//! [`ExtractResult`] is what every extraction call returns, including the
//! "nothing found" outcome. It serializes to a flat mapping with the keys
//! `title`, `text`, `parse_method`, `language`, `language_method` and, for
//! URL-based calls only, `result_url`.

use serde::{Serialize, Serializer};

/// Strategy that produced the extracted text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMethod {
    /// Readability-style article extraction.
    Readability,
    /// Boilerplate-removal extraction.
    Boilerplate,
    /// The density-scoring pipeline.
    Custom,
    /// Every strategy came back empty.
    #[default]
    None,
}

/// How the document language was determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageMethod {
    /// Read from the HTML (`lang` attribute or `content-language` meta tag).
    Html,
    /// Answered by the remote identification service.
    Service,
    /// Not determined.
    #[default]
    None,
}

/// A detected language together with the way it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedLanguage {
    /// ISO 639-1 code (or the raw `content-language` value).
    pub code: String,
    /// Detection source. Never [`LanguageMethod::None`].
    pub method: LanguageMethod,
}

/// Result of extracting an article from a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractResult {
    /// Article title, when any stage produced one.
    pub title: Option<String>,

    /// Main readable text. `None` means every strategy failed.
    pub text: Option<String>,

    /// Strategy that produced `text`.
    pub parse_method: ParseMethod,

    /// Detected language; code and method are always set together.
    pub detected_language: Option<DetectedLanguage>,

    /// Final URL after redirects (URL-based calls only).
    pub result_url: Option<String>,
}

impl ExtractResult {
    /// Result for a document with no extractable article.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Language code, if one was detected.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.detected_language.as_ref().map(|lang| lang.code.as_str())
    }

    /// How the language was detected.
    #[must_use]
    pub fn language_method(&self) -> LanguageMethod {
        self.detected_language
            .as_ref()
            .map_or(LanguageMethod::None, |lang| lang.method)
    }

    /// Whether any strategy produced text.
    #[must_use]
    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }
}

#[derive(Serialize)]
struct Flat<'a> {
    title: Option<&'a str>,
    text: Option<&'a str>,
    parse_method: ParseMethod,
    language: Option<&'a str>,
    language_method: LanguageMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    result_url: Option<&'a str>,
}

impl Serialize for ExtractResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Flat {
            title: self.title.as_deref(),
            text: self.text.as_deref(),
            parse_method: self.parse_method,
            language: self.language(),
            language_method: self.language_method(),
            result_url: self.result_url.as_deref(),
        }
        .serialize(serializer)
    }
}
