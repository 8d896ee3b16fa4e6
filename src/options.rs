//! Configuration options for article extraction.
//!
//! The `Options` struct controls which extraction strategies run, how the
//! extractor identifies itself on the network, and whether the remote
//! language identification service may be used.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// Default endpoint of the DetectLanguage-compatible identification API.
pub const DEFAULT_LANGUAGE_SERVICE_URL: &str = "https://ws.detectlanguage.com/0.2/detect";

/// Environment variable holding the language service API key.
pub const API_KEY_ENV: &str = "DETECT_LANGUAGE_KEY";

/// Environment variable overriding the outbound User-Agent.
pub const USER_AGENT_ENV: &str = "ARTICLE_EXTRACTOR_USER_AGENT";

/// Environment variable pinning a single extraction strategy.
pub const STRATEGY_ENV: &str = "ARTICLE_EXTRACTOR_STRATEGY";

/// A pinned extraction strategy.
///
/// Without one, the extractor runs readability, then boilerplate, then the
/// custom density pipeline, keeping the first non-empty text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Strategy {
    /// Only the readability-style extractor.
    Readability,
    /// Only the boilerplate-removal extractor.
    Boilerplate,
    /// Boilerplate extractor, then the custom pipeline if it found nothing.
    BoilerplateThenCustom,
    /// Only the custom density pipeline.
    Custom,
}

impl Strategy {
    /// Canonical name of the strategy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Readability => "readability",
            Self::Boilerplate => "boilerplate",
            Self::BoilerplateThenCustom => "boilerplate_then_custom",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "readability" => Ok(Self::Readability),
            "boilerplate" | "goose" => Ok(Self::Boilerplate),
            "boilerplate_then_custom" | "goosecustom" => Ok(Self::BoilerplateThenCustom),
            "custom" => Ok(Self::Custom),
            other => Err(Error::InvalidStrategy(other.to_string())),
        }
    }
}

impl TryFrom<String> for Strategy {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Configuration options for article extraction.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use article_extractor::{Options, Strategy};
///
/// let options = Options {
///     forced_strategy: Some(Strategy::Custom),
///     ..Options::default()
/// };
/// assert_eq!(options.max_redirects, 5);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// API key for the remote language identification service.
    ///
    /// Remote detection only runs when this is set and the HTML carried no
    /// language hint.
    ///
    /// Default: `None`
    pub api_key: Option<String>,

    /// User-Agent sent when downloading pages.
    ///
    /// Redirect probing never sends it: some redirect services answer custom
    /// agents with a client-side refresh page instead of a `Location` header.
    ///
    /// Default: `None` (the HTTP client's own identity)
    pub user_agent: Option<String>,

    /// Run exactly one strategy (or chain) instead of automatic fallthrough.
    ///
    /// Default: `None`
    pub forced_strategy: Option<Strategy>,

    /// Maximum number of redirect hops followed before giving up.
    ///
    /// Default: `5`
    pub max_redirects: usize,

    /// Timeout applied to each outbound request.
    ///
    /// Default: 30 seconds
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,

    /// Number of characters of normalized text sent to the language service.
    ///
    /// Default: `100`
    pub language_sample_chars: usize,

    /// Endpoint of the language identification service.
    ///
    /// Default: [`DEFAULT_LANGUAGE_SERVICE_URL`]
    pub language_service_url: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            api_key: None,
            user_agent: None,
            forced_strategy: None,
            max_redirects: 5,
            request_timeout: Duration::from_secs(30),
            language_sample_chars: 100,
            language_service_url: DEFAULT_LANGUAGE_SERVICE_URL.to_string(),
        }
    }
}

impl Options {
    /// Builds options from the process environment.
    ///
    /// Reads [`API_KEY_ENV`], [`USER_AGENT_ENV`] and [`STRATEGY_ENV`]. Empty
    /// values count as unset; an unknown strategy name is logged and ignored.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let forced_strategy = non_empty(STRATEGY_ENV).and_then(|name| match name.parse() {
            Ok(strategy) => Some(strategy),
            Err(err) => {
                tracing::warn!("{err}; using automatic strategy selection");
                None
            }
        });

        Self {
            api_key: non_empty(API_KEY_ENV),
            user_agent: non_empty(USER_AGENT_ENV),
            forced_strategy,
            ..Self::default()
        }
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}
