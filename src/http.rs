//! HTTP collaborator.
//!
//! The extractor talks to the network through the [`HttpClient`] trait so
//! tests can script responses. [`ReqwestClient`] is the default blocking
//! implementation.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use reqwest::redirect::Policy;
use tracing::instrument;

use crate::encoding::transcode_to_utf8;
use crate::error::{Error, Result};

/// Redirects followed by full page fetches.
const PAGE_REDIRECT_LIMIT: usize = 10;

/// Parameters of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// Issue a `HEAD` request and skip the body.
    pub headers_only: bool,
    /// Let the client follow redirects itself.
    pub follow_redirects: bool,
    /// Explicit `User-Agent`; the client's own identity is sent otherwise.
    pub user_agent: Option<String>,
}

impl FetchRequest {
    /// Header-only request that leaves redirects to the caller.
    #[must_use]
    pub fn head_only(user_agent: Option<String>) -> Self {
        Self {
            headers_only: true,
            follow_redirects: false,
            user_agent,
        }
    }

    /// Full `GET` that follows redirects.
    #[must_use]
    pub fn page(user_agent: Option<String>) -> Self {
        Self {
            headers_only: false,
            follow_redirects: true,
            user_agent,
        }
    }
}

/// A response as seen on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawResponse {
    /// Status code.
    pub status: u16,
    /// Header block, one `Name: value` line per header.
    pub headers: String,
    /// Response body (empty for header-only requests).
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Value of the first header called `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    /// Body decoded to UTF-8 using the declared or detected charset.
    #[must_use]
    pub fn text(&self) -> String {
        transcode_to_utf8(&self.body, self.header("content-type"))
    }
}

/// Find a header value in a raw header block (case-insensitive name).
#[must_use]
pub fn header_value<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

/// Network access used by redirect resolution and page fetching.
pub trait HttpClient {
    /// Perform one request. Non-success statuses are returned, not raised.
    fn fetch(&self, url: &str, request: &FetchRequest) -> Result<RawResponse>;
}

/// Fetch a page body as UTF-8 text, failing on non-success statuses.
pub fn fetch_page(client: &dyn HttpClient, url: &str, user_agent: Option<&str>) -> Result<String> {
    let response = client.fetch(url, &FetchRequest::page(user_agent.map(ToString::to_string)))?;
    if !(200..300).contains(&response.status) {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }
    Ok(response.text())
}

/// Blocking `reqwest` implementation of [`HttpClient`].
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    following: Client,
    manual: Client,
}

impl ReqwestClient {
    /// Build the client pair with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let build = |policy: Policy| {
            Client::builder()
                .connect_timeout(timeout.min(Duration::from_secs(10)))
                .timeout(timeout)
                .redirect(policy)
                .build()
        };
        Ok(Self {
            following: build(Policy::limited(PAGE_REDIRECT_LIMIT))?,
            manual: build(Policy::none())?,
        })
    }
}

impl HttpClient for ReqwestClient {
    #[instrument(skip_all, fields(url = %url, head = request.headers_only))]
    fn fetch(&self, url: &str, request: &FetchRequest) -> Result<RawResponse> {
        let parsed = url::Url::parse(url)?;
        let client = if request.follow_redirects {
            &self.following
        } else {
            &self.manual
        };

        let mut builder = if request.headers_only {
            client.head(parsed)
        } else {
            client.get(parsed)
        };
        if let Some(agent) = &request.user_agent {
            builder = builder.header(USER_AGENT, agent);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| format!("{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes())))
            .collect::<String>();

        let body = if request.headers_only {
            Vec::new()
        } else {
            response.bytes()?.to_vec()
        };
        tracing::debug!(status, bytes = body.len(), "response received");

        Ok(RawResponse { status, headers, body })
    }
}
