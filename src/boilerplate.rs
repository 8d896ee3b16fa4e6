//! Boilerplate-removal extraction.
//!
//! [`BaselineExtractor`] is the default [`BoilerplateExtractor`]: it strips
//! page chrome and looks for article text in structured data, `<article>`
//! elements and body paragraphs, in that order. When none of those hold
//! text it reports an empty result instead of returning the whole body, so
//! the density pipeline still gets its turn.

use std::collections::HashSet;
use std::sync::Arc;

use dom_query::{Document, Selection};
use serde_json::Value;

use crate::error::Result;
use crate::http::{fetch_page, HttpClient};

/// Input of a boilerplate extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source<'a> {
    /// Fetch the page at this URL first.
    Url(&'a str),
    /// Use this markup directly.
    Html(&'a str),
}

/// Output of a boilerplate extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoilerplateArticle {
    /// Page title, if any.
    pub title: Option<String>,
    /// Extracted text; empty when nothing article-like was found.
    pub clean_text: String,
    /// Markup the extraction ran on.
    pub raw_html: String,
}

/// A boilerplate-removal extractor.
pub trait BoilerplateExtractor {
    /// Extract the article from a URL or from HTML.
    fn extract(&self, source: &Source<'_>) -> Result<BoilerplateArticle>;
}

/// Text shorter than this (in chars) keeps the search going.
const SUBSTANTIAL_CHARS: usize = 100;

static CHROME_SELECTOR: &str = "aside, footer, nav, header, div[id*=\"footer\"], div[class*=\"footer\"], div[class*=\"consent\"], div[class*=\"cookie\"], div[class*=\"privacy\"], div[class*=\"gdpr\"], div[class*=\"banner\"], div[class*=\"modal\"], div[class*=\"popup\"], div[class*=\"newsletter\"], script, style, noscript";

static PARAGRAPH_SELECTOR: &str = "blockquote, pre, q, code, p";

/// Structured-data and paragraph based extractor.
pub struct BaselineExtractor {
    client: Arc<dyn HttpClient>,
    user_agent: Option<String>,
}

impl BaselineExtractor {
    /// Extractor fetching URLs through `client`.
    #[must_use]
    pub fn new(client: Arc<dyn HttpClient>, user_agent: Option<String>) -> Self {
        Self { client, user_agent }
    }
}

impl BoilerplateExtractor for BaselineExtractor {
    fn extract(&self, source: &Source<'_>) -> Result<BoilerplateArticle> {
        let raw_html = match source {
            Source::Html(html) => (*html).to_string(),
            Source::Url(url) => fetch_page(self.client.as_ref(), url, self.user_agent.as_deref())?,
        };

        let doc = Document::from(raw_html.as_str());
        let title = extract_title(&doc);
        let clean_text = baseline_text(&doc);
        tracing::debug!(chars = clean_text.chars().count(), "baseline extraction finished");

        Ok(BoilerplateArticle {
            title,
            clean_text,
            raw_html,
        })
    }
}

/// Page title from `og:title`, then `<title>`, then the first `<h1>`.
#[must_use]
pub fn extract_title(doc: &Document) -> Option<String> {
    doc.select(r#"meta[property="og:title"]"#)
        .attr("content")
        .and_then(|t| crate::text::non_empty(&t))
        .or_else(|| first_text(doc, "title"))
        .or_else(|| first_text(doc, "h1"))
}

fn first_text(doc: &Document, selector: &str) -> Option<String> {
    let selection = doc.select(selector);
    let node = selection.nodes().first()?;
    crate::text::non_empty(&node.text())
}

/// Search `articleBody` anywhere in a JSON-LD value.
fn find_article_body(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => map.iter().find_map(|(key, val)| match val {
            Value::String(s) if key.eq_ignore_ascii_case("articlebody") => Some(s.as_str()),
            _ => find_article_body(val),
        }),
        Value::Array(items) => items.iter().find_map(find_article_body),
        _ => None,
    }
}

/// Article body declared in `application/ld+json` scripts.
#[must_use]
pub fn json_ld_article_body(doc: &Document) -> Option<String> {
    doc.select(r#"script[type="application/ld+json"]"#)
        .nodes()
        .iter()
        .filter_map(|script| serde_json::from_str::<Value>(script.text().trim()).ok())
        .find_map(|data| {
            let body = find_article_body(&data)?.trim();
            if body.is_empty() {
                None
            } else if body.contains("<p>") {
                let fragment = Document::from(format!("<div>{body}</div>"));
                crate::text::non_empty(&fragment.select("div").text())
            } else {
                Some(body.to_string())
            }
        })
}

fn remove_chrome(doc: &Document) {
    doc.select(CHROME_SELECTOR).remove();
}

fn is_noise(entry: &str) -> bool {
    let lower = entry.to_lowercase();
    if (lower.contains("cookie") && lower.contains("consent")) || lower.contains("tracking technolog") {
        return true;
    }
    // menu-like blocks put every word on its own line
    let newlines = entry.matches('\n').count();
    let words = entry.split_whitespace().count();
    words > 0 && newlines > words / 2
}

fn baseline_text(doc: &Document) -> String {
    let mut text = json_ld_article_body(doc).unwrap_or_default();
    if text.chars().count() > SUBSTANTIAL_CHARS {
        return text;
    }

    remove_chrome(doc);

    let article = doc.select("article");
    if let Some(node) = article.nodes().first() {
        let article_text = node.text().trim().to_string();
        if article_text.chars().count() > SUBSTANTIAL_CHARS {
            text = format!("{text} {article_text}");
            return text.trim().to_string();
        }
    }

    let mut seen = HashSet::new();
    for node in doc.select("body").select(PARAGRAPH_SELECTOR).nodes() {
        let entry = Selection::from(*node).text().trim().to_string();
        if entry.is_empty() || is_noise(&entry) || !seen.insert(entry.clone()) {
            continue;
        }
        text.push(' ');
        text.push_str(&entry);
    }

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::http::{FetchRequest, RawResponse};

    struct NoNetwork;

    impl HttpClient for NoNetwork {
        fn fetch(&self, _url: &str, _request: &FetchRequest) -> Result<RawResponse> {
            Err(Error::Fetch("offline".to_string()))
        }
    }

    fn extract_html(html: &str) -> BoilerplateArticle {
        BaselineExtractor::new(Arc::new(NoNetwork), None)
            .extract(&Source::Html(html))
            .expect("html input never fetches")
    }

    const LONG: &str = "This paragraph is long enough to count as the body of an article because it keeps going past one hundred characters.";

    #[test]
    fn title_prefers_open_graph() {
        let html = r#"<html><head><meta property="og:title" content="OG Title"><title>Doc Title</title></head><body><h1>H1</h1></body></html>"#;
        assert_eq!(extract_html(html).title.as_deref(), Some("OG Title"));

        let html = "<html><head><title> Doc Title </title></head><body><h1>H1</h1></body></html>";
        assert_eq!(extract_html(html).title.as_deref(), Some("Doc Title"));

        let html = "<html><body><h1>Heading</h1></body></html>";
        assert_eq!(extract_html(html).title.as_deref(), Some("Heading"));
    }

    #[test]
    fn json_ld_article_body_is_used_first() {
        let html = format!(
            r#"<html><head><script type="application/ld+json">{{"@type":"NewsArticle","articleBody":"{LONG}"}}</script></head><body><p>other</p></body></html>"#
        );
        assert_eq!(extract_html(&html).clean_text, LONG);
    }

    #[test]
    fn nested_json_ld_is_searched() {
        let doc = Document::from(format!(
            r#"<html><head><script type="application/ld+json">{{"@graph":[{{"@type":"WebPage"}},{{"ArticleBody":"{LONG}"}}]}}</script></head></html>"#
        ));
        assert_eq!(json_ld_article_body(&doc).as_deref(), Some(LONG));
    }

    #[test]
    fn article_element_beats_paragraphs() {
        let html = format!(
            "<html><body><nav><p>Menu entry</p></nav><article><p>{LONG}</p></article><div><p>Sidebar note</p></div></body></html>"
        );
        assert_eq!(extract_html(&html).clean_text, LONG);
    }

    #[test]
    fn paragraphs_are_deduplicated_and_chrome_removed() {
        let html = "<html><body><header><p>Site name</p></header><div><p>First point.</p><p>Second point.</p><p>First point.</p></div><footer><p>Legal</p></footer></body></html>";
        assert_eq!(extract_html(html).clean_text, "First point. Second point.");
    }

    #[test]
    fn cookie_notices_are_skipped() {
        let html = "<html><body><p>We use cookies; by continuing you consent to them.</p><p>Actual text.</p></body></html>";
        assert_eq!(extract_html(html).clean_text, "Actual text.");
    }

    #[test]
    fn divs_without_paragraphs_give_empty_text() {
        let html = "<html><body><div>Only div text with no paragraphs at all, which this extractor does not take.</div></body></html>";
        let article = extract_html(html);
        assert_eq!(article.clean_text, "");
        assert_eq!(article.raw_html, html);
    }

    #[test]
    fn url_source_propagates_fetch_errors() {
        let extractor = BaselineExtractor::new(Arc::new(NoNetwork), None);
        assert!(extractor.extract(&Source::Url("https://example.com/")).is_err());
    }
}
