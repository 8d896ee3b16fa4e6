//! Readability-style article extraction.
//!
//! The stage hands the whole page to a Mozilla Readability port and turns
//! the returned article HTML into plain text with
//! [`html_fragment_to_text`](crate::text::html_fragment_to_text).

use crate::error::{Error, Result};

/// Article found by a readability-style extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadableArticle {
    /// Article title, if one was found.
    pub title: Option<String>,
    /// Cleaned article markup.
    pub content_html: String,
}

/// A readability-style extractor.
pub trait ReadabilityExtractor {
    /// Find the article in a full HTML page.
    fn parse(&self, html: &str) -> Result<ReadableArticle>;
}

/// [`ReadabilityExtractor`] backed by `dom_smoothie`.
///
/// Without the `readability` feature every call fails, which the
/// orchestrator treats as an empty stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomSmoothieReadability;

impl ReadabilityExtractor for DomSmoothieReadability {
    #[cfg(feature = "readability")]
    fn parse(&self, html: &str) -> Result<ReadableArticle> {
        use dom_smoothie::Readability;

        let mut reader =
            Readability::new(html, None, None).map_err(|e| Error::Readability(e.to_string()))?;
        let article = reader.parse().map_err(|e| Error::Readability(e.to_string()))?;

        Ok(ReadableArticle {
            title: crate::text::non_empty(&article.title),
            content_html: article.content.to_string(),
        })
    }

    #[cfg(not(feature = "readability"))]
    fn parse(&self, _html: &str) -> Result<ReadableArticle> {
        Err(Error::Readability(
            "built without the `readability` feature".to_string(),
        ))
    }
}
