//! # article-extractor
//!
//! Extract the readable text, title and language of an article from a web
//! page or a raw HTML document.
//!
//! Three strategies are tried in order until one yields text:
//!
//! 1. a readability-style extractor (`dom_smoothie`),
//! 2. a boilerplate-removal extractor (structured data, `<article>`,
//!    paragraphs),
//! 3. a density-scoring pipeline that needs no class-name conventions at all
//!    (see [`extractor`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use article_extractor::{extract_html, ParseMethod};
//!
//! let html = r#"<html lang="de"><head><title>Bericht</title></head>
//! <body><article><p>Ein kurzer Artikel mit ein paar Worten.</p></article></body></html>"#;
//!
//! let result = extract_html(html)?;
//! assert_ne!(result.parse_method, ParseMethod::None);
//! assert_eq!(result.language(), Some("de"));
//! # Ok::<(), article_extractor::Error>(())
//! ```
//!
//! ## Logging
//!
//! Progress is reported through `tracing`. The library never installs a
//! subscriber; attach one in the application (or scope one to a call with
//! `tracing::subscriber::with_default`).

mod error;
mod extract;
mod options;
mod result;

/// Node arena built from parsed HTML.
pub mod dom;

/// Density-scoring content extraction.
pub mod extractor;

/// Character encoding detection and normalization.
pub mod encoding;

/// Entity decoding and whitespace cleanup helpers.
pub mod text;

/// HTTP collaborator trait and default client.
pub mod http;

/// Bounded redirect resolution.
pub mod redirect;

/// Language hint scanning and remote detection.
pub mod language;

/// Readability-style extraction stage.
pub mod readability;

/// Boilerplate-removal extraction stage.
pub mod boilerplate;

// Public API - re-exports
pub use error::{Error, Result};
pub use extract::Extractor;
pub use options::{Options, Strategy, API_KEY_ENV, DEFAULT_LANGUAGE_SERVICE_URL, STRATEGY_ENV, USER_AGENT_ENV};
pub use result::{DetectedLanguage, ExtractResult, LanguageMethod, ParseMethod};

/// Extracts an article from a URL or an HTML document using default options.
///
/// Input starting with `http://` or `https://` is fetched; anything else is
/// parsed as HTML.
///
/// # Errors
///
/// Fails only when the default HTTP client cannot be initialised. A page
/// without an article is not an error: the result has
/// `parse_method == ParseMethod::None`.
pub fn extract(input: &str) -> Result<ExtractResult> {
    extract_with_options(input, &Options::default())
}

/// Extracts an article from a URL or an HTML document with custom options.
///
/// # Example
///
/// ```rust
/// use article_extractor::{extract_with_options, Options, ParseMethod, Strategy};
///
/// let options = Options {
///     forced_strategy: Some(Strategy::Custom),
///     ..Options::default()
/// };
/// let html = "<html><body><div>nav</div><div>The body text of the article sits right here.</div></body></html>";
/// let result = extract_with_options(html, &options)?;
/// assert_eq!(result.parse_method, ParseMethod::Custom);
/// assert_eq!(result.text.as_deref(), Some("The body text of the article sits right here."));
/// # Ok::<(), article_extractor::Error>(())
/// ```
///
/// # Errors
///
/// Fails only when the default HTTP client cannot be initialised.
pub fn extract_with_options(input: &str, options: &Options) -> Result<ExtractResult> {
    Ok(Extractor::new(options.clone())?.extract(input))
}

/// Extracts an article from an HTML document using default options.
///
/// # Errors
///
/// Fails only when the default HTTP client cannot be initialised.
pub fn extract_html(html: &str) -> Result<ExtractResult> {
    Ok(Extractor::new(Options::default())?.extract_html(html))
}

/// Resolves redirects and extracts the article at `url` using default options.
///
/// # Errors
///
/// Fails only when the default HTTP client cannot be initialised.
pub fn extract_url(url: &str) -> Result<ExtractResult> {
    Ok(Extractor::new(Options::default())?.extract_url(url))
}
