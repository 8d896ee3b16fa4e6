//! Extraction orchestration.
//!
//! [`Extractor`] runs the strategies in order (or the one pinned in
//! [`Options::forced_strategy`]), keeps the first non-empty text, then adds
//! language information and normalizes the output. Stage failures never
//! escape: they are logged and count as "no text from this stage".

use std::sync::Arc;

use crate::boilerplate::{BaselineExtractor, BoilerplateExtractor, Source};
use crate::encoding::normalize;
use crate::error::Result;
use crate::extractor::pipeline;
use crate::http::{fetch_page, HttpClient, ReqwestClient};
use crate::language::{self, DetectLanguageService, LanguageService};
use crate::options::{Options, Strategy};
use crate::readability::{DomSmoothieReadability, ReadabilityExtractor};
use crate::redirect::RedirectResolver;
use crate::result::{DetectedLanguage, ExtractResult, LanguageMethod, ParseMethod};
use crate::text::{html_fragment_to_text, non_empty};

/// What a single stage produced.
///
/// `raw_html` is the markup the stage worked on; it feeds the language
/// hint scan and the custom stage but never reaches the caller.
#[derive(Debug, Clone, Default)]
struct StageOutcome {
    title: Option<String>,
    text: Option<String>,
    raw_html: Option<String>,
}

impl StageOutcome {
    fn has_text(&self) -> bool {
        self.text.is_some()
    }
}

/// Article extractor with its collaborators.
///
/// Construct once and reuse; every call is independent.
///
/// # Example
///
/// ```rust
/// use article_extractor::{Extractor, Options, ParseMethod};
///
/// let extractor = Extractor::new(Options::default())?;
/// let result = extractor.extract_html(
///     "<html lang=\"en\"><body><div><p>Plenty of words in this one paragraph.</p></div></body></html>",
/// );
/// assert_ne!(result.parse_method, ParseMethod::None);
/// assert_eq!(result.language(), Some("en"));
/// # Ok::<(), article_extractor::Error>(())
/// ```
pub struct Extractor {
    options: Options,
    http: Arc<dyn HttpClient>,
    readability: Box<dyn ReadabilityExtractor>,
    boilerplate: Box<dyn BoilerplateExtractor>,
    language_service: Option<Box<dyn LanguageService>>,
}

impl Extractor {
    /// Extractor with the default network stack.
    ///
    /// # Errors
    ///
    /// Fails when the HTTP client cannot be initialised.
    pub fn new(options: Options) -> Result<Self> {
        let http = Arc::new(ReqwestClient::new(options.request_timeout)?);
        Ok(Self::with_http_client(options, http))
    }

    /// Extractor using `http` for every network access.
    ///
    /// The remote language service is set up only when an API key is
    /// configured.
    #[must_use]
    pub fn with_http_client(options: Options, http: Arc<dyn HttpClient>) -> Self {
        let language_service = options.api_key.as_ref().and_then(|key| {
            match DetectLanguageService::new(
                key.clone(),
                options.language_service_url.clone(),
                options.request_timeout,
            ) {
                Ok(service) => Some(Box::new(service) as Box<dyn LanguageService>),
                Err(err) => {
                    tracing::warn!(error = %err, "language service unavailable");
                    None
                }
            }
        });
        let boilerplate = BaselineExtractor::new(Arc::clone(&http), options.user_agent.clone());

        Self {
            options,
            http,
            readability: Box::new(DomSmoothieReadability),
            boilerplate: Box::new(boilerplate),
            language_service,
        }
    }

    /// Replace the readability-style extractor.
    #[must_use]
    pub fn with_readability(mut self, readability: Box<dyn ReadabilityExtractor>) -> Self {
        self.readability = readability;
        self
    }

    /// Replace the boilerplate extractor.
    #[must_use]
    pub fn with_boilerplate(mut self, boilerplate: Box<dyn BoilerplateExtractor>) -> Self {
        self.boilerplate = boilerplate;
        self
    }

    /// Replace the language identification service.
    #[must_use]
    pub fn with_language_service(mut self, service: Box<dyn LanguageService>) -> Self {
        self.language_service = Some(service);
        self
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Extract from a URL or from HTML.
    ///
    /// Input starting with `http://` or `https://` is treated as a URL.
    pub fn extract(&self, input: &str) -> ExtractResult {
        let trimmed = input.trim_start();
        let lower = trimmed.get(..8).unwrap_or(trimmed).to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            self.extract_url(trimmed.trim_end())
        } else {
            self.extract_html(input)
        }
    }

    /// Extract from an HTML document.
    pub fn extract_html(&self, html: &str) -> ExtractResult {
        let span = tracing::info_span!("extract", input = "html", strategy = self.strategy_name());
        let _enter = span.enter();

        self.run(Source::Html(html))
    }

    /// Resolve redirects, then extract from the final URL.
    ///
    /// `result_url` is set even when no strategy finds text.
    pub fn extract_url(&self, url: &str) -> ExtractResult {
        let span = tracing::info_span!("extract", input = "url", strategy = self.strategy_name());
        let _enter = span.enter();

        let resolution = RedirectResolver::new(self.http.as_ref())
            .with_max_hops(self.options.max_redirects)
            .resolve(url);

        let mut result = self.run(Source::Url(&resolution.url));
        result.result_url = Some(resolution.url);
        result
    }

    fn strategy_name(&self) -> &'static str {
        self.options.forced_strategy.map_or("auto", Strategy::as_str)
    }

    fn run(&self, source: Source<'_>) -> ExtractResult {
        let (outcome, method) = match self.options.forced_strategy {
            None => self.run_automatic(source),
            Some(Strategy::Readability) => (self.readability_stage(source), ParseMethod::Readability),
            Some(Strategy::Boilerplate) => (self.boilerplate_stage(source), ParseMethod::Boilerplate),
            Some(Strategy::BoilerplateThenCustom) => {
                let prior = self.boilerplate_stage(source);
                if prior.has_text() {
                    (prior, ParseMethod::Boilerplate)
                } else {
                    (self.custom_stage(source, Some(prior)), ParseMethod::Custom)
                }
            }
            Some(Strategy::Custom) => (self.custom_stage(source, None), ParseMethod::Custom),
        };

        if !outcome.has_text() {
            tracing::info!("no strategy produced text");
            return ExtractResult::empty();
        }
        tracing::info!(method = ?method, "article extracted");
        self.finish(outcome, method)
    }

    fn run_automatic(&self, source: Source<'_>) -> (StageOutcome, ParseMethod) {
        let readable = self.readability_stage(source);
        if readable.has_text() {
            return (readable, ParseMethod::Readability);
        }
        tracing::debug!("readability found nothing; trying boilerplate");

        let boilerplate = self.boilerplate_stage(source);
        if boilerplate.has_text() {
            return (boilerplate, ParseMethod::Boilerplate);
        }
        tracing::debug!("boilerplate found nothing; trying custom pipeline");

        (self.custom_stage(source, Some(boilerplate)), ParseMethod::Custom)
    }

    fn readability_stage(&self, source: Source<'_>) -> StageOutcome {
        swallow("readability", || {
            let html = self.source_html(source)?;
            let article = self.readability.parse(&html)?;
            Ok(StageOutcome {
                title: article.title,
                text: non_empty(&html_fragment_to_text(&article.content_html)),
                raw_html: Some(html),
            })
        })
    }

    fn boilerplate_stage(&self, source: Source<'_>) -> StageOutcome {
        swallow("boilerplate", || {
            let article = self.boilerplate.extract(&source)?;
            Ok(StageOutcome {
                title: article.title,
                text: non_empty(&article.clean_text),
                raw_html: Some(article.raw_html),
            })
        })
    }

    /// The density pipeline.
    ///
    /// `prior` is the boilerplate stage's outcome when that stage already
    /// ran; its title and markup are reused. Standalone, the boilerplate
    /// extractor is asked for them first.
    fn custom_stage(&self, source: Source<'_>, prior: Option<StageOutcome>) -> StageOutcome {
        swallow("custom", || {
            let (title, html) = match prior {
                Some(StageOutcome {
                    title,
                    raw_html: Some(html),
                    ..
                }) => (title, html),
                Some(_) => (None, self.source_html(source)?),
                None => match self.boilerplate.extract(&source) {
                    Ok(article) => (article.title, article.raw_html),
                    Err(err) => {
                        tracing::debug!(error = %err, "boilerplate unavailable for title; fetching directly");
                        (None, self.source_html(source)?)
                    }
                },
            };

            let text = pipeline::extract_text(&html)?;
            Ok(StageOutcome {
                title,
                text,
                raw_html: Some(html),
            })
        })
    }

    fn source_html(&self, source: Source<'_>) -> Result<String> {
        match source {
            Source::Html(html) => Ok(html.to_string()),
            Source::Url(url) => fetch_page(self.http.as_ref(), url, self.options.user_agent.as_deref()),
        }
    }

    fn finish(&self, outcome: StageOutcome, method: ParseMethod) -> ExtractResult {
        let StageOutcome {
            title,
            text,
            raw_html,
        } = outcome;

        let hint = raw_html.as_deref().and_then(language::scan);
        drop(raw_html);

        let title = title.map(|t| normalize(&t).into_owned());
        let text = text.map(|t| normalize(&t).into_owned());

        let detected_language = match hint {
            Some(code) => Some(DetectedLanguage {
                code,
                method: LanguageMethod::Html,
            }),
            None => text.as_deref().and_then(|t| self.detect_remote(t)),
        };

        ExtractResult {
            title,
            text,
            parse_method: method,
            detected_language,
            result_url: None,
        }
    }

    fn detect_remote(&self, text: &str) -> Option<DetectedLanguage> {
        self.options.api_key.as_ref()?;
        let service = self.language_service.as_ref()?;

        let sample: String = text.chars().take(self.options.language_sample_chars).collect();
        match service.detect(&sample) {
            Ok(Some(code)) => Some(DetectedLanguage {
                code,
                method: LanguageMethod::Service,
            }),
            Ok(None) => {
                tracing::debug!("language service could not identify the text");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "language detection failed");
                None
            }
        }
    }
}

/// Run a stage, turning any error into an empty outcome.
fn swallow(stage: &str, run: impl FnOnce() -> Result<StageOutcome>) -> StageOutcome {
    match run() {
        Ok(outcome) => {
            tracing::debug!(stage, found = outcome.has_text(), "stage finished");
            outcome
        }
        Err(err) => {
            tracing::warn!(stage, error = %err, "stage failed");
            StageOutcome::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boilerplate::BoilerplateArticle;
    use crate::error::Error;
    use crate::http::{FetchRequest, RawResponse};
    use crate::readability::ReadableArticle;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Offline;

    impl HttpClient for Offline {
        fn fetch(&self, _url: &str, _request: &FetchRequest) -> Result<RawResponse> {
            Err(Error::Fetch("offline".to_string()))
        }
    }

    struct FailingReadability;

    impl ReadabilityExtractor for FailingReadability {
        fn parse(&self, _html: &str) -> Result<ReadableArticle> {
            Err(Error::Readability("no article".to_string()))
        }
    }

    struct FixedReadability(&'static str);

    impl ReadabilityExtractor for FixedReadability {
        fn parse(&self, _html: &str) -> Result<ReadableArticle> {
            Ok(ReadableArticle {
                title: Some("Readable".to_string()),
                content_html: self.0.to_string(),
            })
        }
    }

    struct EmptyBoilerplate {
        calls: Rc<Cell<usize>>,
    }

    impl BoilerplateExtractor for EmptyBoilerplate {
        fn extract(&self, source: &Source<'_>) -> Result<BoilerplateArticle> {
            self.calls.set(self.calls.get() + 1);
            let Source::Html(html) = source else {
                return Err(Error::Fetch("offline".to_string()));
            };
            Ok(BoilerplateArticle {
                title: Some("Boilerplate title".to_string()),
                clean_text: "   ".to_string(),
                raw_html: (*html).to_string(),
            })
        }
    }

    const PAGE: &str = "<html><body><div class=\"ad\">buy</div><section><div>Custom pipeline text with several words.</div></section></body></html>";

    fn offline(options: Options) -> Extractor {
        Extractor::with_http_client(options, Arc::new(Offline))
    }

    #[test]
    fn readability_html_is_converted_to_text() {
        let extractor = offline(Options::default())
            .with_readability(Box::new(FixedReadability("<h1>Head</h1><p>Body &amp; soul</p>")));
        let result = extractor.extract_html(PAGE);

        assert_eq!(result.parse_method, ParseMethod::Readability);
        assert_eq!(result.text.as_deref(), Some("Head\nBody & soul"));
        assert_eq!(result.title.as_deref(), Some("Readable"));
    }

    #[test]
    fn falls_through_to_custom_and_reuses_boilerplate_title() {
        let calls = Rc::new(Cell::new(0));
        let extractor = offline(Options::default())
            .with_readability(Box::new(FailingReadability))
            .with_boilerplate(Box::new(EmptyBoilerplate { calls: Rc::clone(&calls) }));
        let result = extractor.extract_html(PAGE);

        assert_eq!(result.parse_method, ParseMethod::Custom);
        assert_eq!(result.text.as_deref(), Some("Custom pipeline text with several words."));
        assert_eq!(result.title.as_deref(), Some("Boilerplate title"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn pinned_custom_asks_boilerplate_for_title() {
        let calls = Rc::new(Cell::new(0));
        let options = Options {
            forced_strategy: Some(Strategy::Custom),
            ..Options::default()
        };
        let extractor = offline(options)
            .with_readability(Box::new(FixedReadability("<p>never used</p>")))
            .with_boilerplate(Box::new(EmptyBoilerplate { calls: Rc::clone(&calls) }));
        let result = extractor.extract_html(PAGE);

        assert_eq!(result.parse_method, ParseMethod::Custom);
        assert_eq!(result.title.as_deref(), Some("Boilerplate title"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn pinned_boilerplate_does_not_fall_through() {
        let options = Options {
            forced_strategy: Some(Strategy::Boilerplate),
            ..Options::default()
        };
        let extractor = offline(options).with_boilerplate(Box::new(EmptyBoilerplate {
            calls: Rc::new(Cell::new(0)),
        }));
        let result = extractor.extract_html(PAGE);

        assert_eq!(result, ExtractResult::empty());
    }

    #[test]
    fn pinned_chain_falls_through_to_custom_with_boilerplate_title() {
        let calls = Rc::new(Cell::new(0));
        let options = Options {
            forced_strategy: Some(Strategy::BoilerplateThenCustom),
            ..Options::default()
        };
        let extractor = offline(options)
            .with_readability(Box::new(FixedReadability("<p>never used</p>")))
            .with_boilerplate(Box::new(EmptyBoilerplate { calls: Rc::clone(&calls) }));
        let result = extractor.extract_html(PAGE);

        assert_eq!(result.parse_method, ParseMethod::Custom);
        assert_eq!(result.text.as_deref(), Some("Custom pipeline text with several words."));
        assert_eq!(result.title.as_deref(), Some("Boilerplate title"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn pinned_readability_does_not_fall_through() {
        let calls = Rc::new(Cell::new(0));
        let options = Options {
            forced_strategy: Some(Strategy::Readability),
            ..Options::default()
        };
        let extractor = offline(options)
            .with_readability(Box::new(FixedReadability("<div> </div>")))
            .with_boilerplate(Box::new(EmptyBoilerplate { calls: Rc::clone(&calls) }));
        let result = extractor.extract_html(PAGE);

        assert_eq!(result, ExtractResult::empty());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn pinned_readability_reports_its_text() {
        let options = Options {
            forced_strategy: Some(Strategy::Readability),
            ..Options::default()
        };
        let extractor = offline(options).with_readability(Box::new(FixedReadability("<p>Readable body</p>")));
        let result = extractor.extract_html(PAGE);

        assert_eq!(result.parse_method, ParseMethod::Readability);
        assert_eq!(result.text.as_deref(), Some("Readable body"));
    }

    #[test]
    fn url_failure_keeps_result_url() {
        let extractor = offline(Options::default());
        let result = extractor.extract("  https://unreachable.example/post ");

        assert_eq!(result.parse_method, ParseMethod::None);
        assert_eq!(result.text, None);
        assert_eq!(result.title, None);
        assert_eq!(result.language(), None);
        assert_eq!(result.result_url.as_deref(), Some("https://unreachable.example/post"));
    }

    #[test]
    fn html_input_is_not_mistaken_for_url() {
        let extractor = offline(Options::default()).with_readability(Box::new(FailingReadability));
        let result = extractor.extract("<p>https://example.com is mentioned here</p>");
        assert_eq!(result.result_url, None);
    }

    #[test]
    fn output_is_normalized() {
        let extractor = offline(Options::default())
            .with_readability(Box::new(FixedReadability("<p>CafÃ© au lait</p>")));
        let result = extractor.extract_html("<html><body></body></html>");
        assert_eq!(result.text.as_deref(), Some("Café au lait"));
    }
}
