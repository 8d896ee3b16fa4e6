//! Error types for article-extractor.
//!
//! These errors travel between the collaborators (HTTP client, parsers,
//! language service) and the extraction stages. None of them escape
//! [`Extractor`](crate::Extractor): a failing stage is logged and treated as
//! having produced no text.

/// Error type for stage and collaborator operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure while talking to a remote host.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// The remote host answered with a non-success status.
    #[error("HTTP status {status} for {url}")]
    HttpStatus {
        /// URL that was requested.
        url: String,
        /// Status code returned.
        status: u16,
    },

    /// A URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// HTML parsing failed or produced an unusable tree.
    #[error("HTML parsing failed: {0}")]
    Parse(String),

    /// The readability-style extractor could not find an article.
    #[error("readability extraction failed: {0}")]
    Readability(String),

    /// The remote language identification service failed.
    #[error("language service failed: {0}")]
    LanguageService(String),

    /// An unknown strategy name was supplied.
    #[error("unknown extraction strategy: {0}")]
    InvalidStrategy(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::HttpStatus {
                url: err.url().map(ToString::to_string).unwrap_or_default(),
                status: status.as_u16(),
            },
            None => Self::Fetch(err.to_string()),
        }
    }
}

/// Result type alias for stage and collaborator operations.
pub type Result<T> = std::result::Result<T, Error>;
