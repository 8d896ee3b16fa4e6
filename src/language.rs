//! Document language detection.
//!
//! Two sources, tried in order by the orchestrator: hints the page declares
//! about itself ([`scan`]), and a remote identification service
//! ([`LanguageService`]) queried with a short sample of the extracted text.

use std::time::Duration;

use serde::Deserialize;

use crate::dom::DomTree;
use crate::error::{Error, Result};

/// Read the language the document declares about itself.
///
/// Prefers the root element's `lang` attribute, then the `content` of a
/// `content-language` meta tag, matched on either `name` or `http-equiv`.
/// Returns `None` when neither is present or the HTML cannot be parsed.
///
/// The `lang` value is cut to its first two characters and lower-cased, so
/// `EN-us` is reported as the ISO 639-1 code `en`. The meta tag content is
/// returned as written (trimmed).
#[must_use]
pub fn scan(html: &str) -> Option<String> {
    let tree = DomTree::parse(html).ok()?;

    if let Some(code) = tree
        .attr(tree.root(), "lang")
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
    {
        return Some(code.chars().take(2).collect::<String>().to_lowercase());
    }

    tree.find(&["meta"]).into_iter().find_map(|meta| {
        let declares = ["name", "http-equiv"].iter().any(|attr| {
            tree.attr(meta, attr)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case("content-language"))
        });
        if !declares {
            return None;
        }
        tree.attr(meta, "content")
            .map(str::trim)
            .filter(|content| !content.is_empty())
            .map(ToString::to_string)
    })
}

/// Remote language identification.
pub trait LanguageService {
    /// Identify the language of a short text sample.
    ///
    /// `Ok(None)` means the service answered but could not tell.
    fn detect(&self, text: &str) -> Result<Option<String>>;
}

/// Client for a DetectLanguage-compatible HTTP API.
#[derive(Debug)]
pub struct DetectLanguageService {
    api_key: String,
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct DetectResponse {
    data: DetectData,
}

#[derive(Debug, Deserialize)]
struct DetectData {
    #[serde(default)]
    detections: Vec<Detection>,
}

#[derive(Debug, Deserialize)]
struct Detection {
    language: String,
}

impl DetectLanguageService {
    /// Create a client for `endpoint` authenticating with `api_key`.
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            client,
        })
    }
}

impl LanguageService for DetectLanguageService {
    fn detect(&self, text: &str) -> Result<Option<String>> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .form(&[("q", text)])
            .send()
            .map_err(|e| Error::LanguageService(e.to_string()))?
            .error_for_status()
            .map_err(|e| Error::LanguageService(e.to_string()))?;

        let body: DetectResponse = response
            .json()
            .map_err(|e| Error::LanguageService(e.to_string()))?;
        Ok(parse_detections(body))
    }
}

fn parse_detections(body: DetectResponse) -> Option<String> {
    body.data
        .detections
        .into_iter()
        .next()
        .map(|d| d.language)
        .filter(|code| !code.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lang_attribute_is_truncated_and_lowercased() {
        assert_eq!(scan(r#"<html lang="fr"><body></body></html>"#).as_deref(), Some("fr"));
        assert_eq!(scan(r#"<html lang="EN-us"><body></body></html>"#).as_deref(), Some("en"));
    }

    #[test]
    fn content_language_meta_by_name_or_http_equiv() {
        let by_name = r#"<html><head><meta name="Content-Language" content=" de "></head><body></body></html>"#;
        assert_eq!(scan(by_name).as_deref(), Some("de"));

        let by_equiv = r#"<html><head><meta http-equiv="content-language" content="pt-BR"></head><body></body></html>"#;
        assert_eq!(scan(by_equiv).as_deref(), Some("pt-BR"));
    }

    #[test]
    fn lang_attribute_wins_over_meta() {
        let html = r#"<html lang="it"><head><meta name="content-language" content="es"></head></html>"#;
        assert_eq!(scan(html).as_deref(), Some("it"));
    }

    #[test]
    fn no_hint_yields_none() {
        assert_eq!(scan("<html><head><meta charset=\"utf-8\"></head><body>x</body></html>"), None);
        assert_eq!(scan(r#"<html lang=""><body>x</body></html>"#), None);
    }

    #[test]
    fn service_response_takes_first_detection() {
        let body: DetectResponse = serde_json::from_str(
            r#"{"data":{"detections":[{"language":"nl","isReliable":true,"confidence":9.1},{"language":"af"}]}}"#,
        )
        .expect("valid json");
        assert_eq!(parse_detections(body).as_deref(), Some("nl"));
    }

    #[test]
    fn service_response_without_detections_is_none() {
        let body: DetectResponse =
            serde_json::from_str(r#"{"data":{"detections":[]}}"#).expect("valid json");
        assert_eq!(parse_detections(body), None);
    }
}
