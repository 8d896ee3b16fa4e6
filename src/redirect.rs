//! Bounded redirect resolution.
//!
//! Shortened and tracking links are resolved hop by hop with header-only
//! requests, so the final article URL is known before any page is
//! downloaded. No client identity is sent unless one is set explicitly:
//! several redirect services answer identified clients with a meta refresh
//! page instead of a `Location` header.

use tracing::instrument;
use url::Url;

use crate::error::Result;
use crate::http::{header_value, FetchRequest, HttpClient};

/// Default number of redirects followed.
pub const DEFAULT_MAX_HOPS: usize = 5;

/// Outcome of resolving one URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Last URL reached.
    pub url: String,
    /// Redirects followed to get there.
    pub hops: usize,
    /// The chain was longer than the hop limit.
    pub bound_exceeded: bool,
}

/// Follows `Location` headers up to a fixed number of hops.
pub struct RedirectResolver<'a> {
    client: &'a dyn HttpClient,
    max_hops: usize,
    user_agent: Option<String>,
}

impl<'a> RedirectResolver<'a> {
    /// Resolver using `client`, following at most [`DEFAULT_MAX_HOPS`].
    #[must_use]
    pub fn new(client: &'a dyn HttpClient) -> Self {
        Self {
            client,
            max_hops: DEFAULT_MAX_HOPS,
            user_agent: None,
        }
    }

    /// Change the hop limit.
    #[must_use]
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Send an explicit `User-Agent` with every redirect lookup.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resolve `url` to the end of its redirect chain.
    ///
    /// Never fails: a transport error ends the chain at the URL that could
    /// not be fetched, and a chain longer than the hop limit ends at the URL
    /// reached after the last permitted hop.
    #[instrument(skip(self), fields(max_hops = self.max_hops))]
    pub fn resolve(&self, url: &str) -> Resolution {
        let request = FetchRequest::head_only(self.user_agent.clone());
        let mut current = url.to_string();
        let mut hops = 0;

        loop {
            current = unwrap_google_redirect(&current);

            let response = match self.client.fetch(&current, &request) {
                Ok(response) => response,
                Err(err) => {
                    tracing::debug!(url = %current, error = %err, "redirect lookup failed; stopping here");
                    return Resolution {
                        url: current,
                        hops,
                        bound_exceeded: false,
                    };
                }
            };

            let Some(location) = find_location_header(&response.headers) else {
                tracing::debug!(url = %current, hops, "redirect chain resolved");
                return Resolution {
                    url: current,
                    hops,
                    bound_exceeded: false,
                };
            };

            if hops >= self.max_hops {
                tracing::warn!(url = %current, hops, "too many redirects; keeping last URL reached");
                return Resolution {
                    url: current,
                    hops,
                    bound_exceeded: true,
                };
            }

            let next = match absolutize(&current, location) {
                Ok(next) => next,
                Err(err) => {
                    tracing::debug!(location, error = %err, "unusable redirect target");
                    return Resolution {
                        url: current,
                        hops,
                        bound_exceeded: false,
                    };
                }
            };
            tracing::debug!(from = %current, to = %next, "redirect found");
            current = next;
            hops += 1;
        }
    }
}

/// Extract the `Location` header value from a raw header block.
#[must_use]
pub fn find_location_header(headers: &str) -> Option<&str> {
    header_value(headers, "location").filter(|value| !value.is_empty())
}

/// Replace a Google search-result wrapper with the URL it points to.
///
/// `https://www.google.com/url?...&url=<target>` becomes `<target>`; any
/// other URL is returned unchanged.
#[must_use]
pub fn unwrap_google_redirect(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let is_wrapper = parsed
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case("www.google.com"))
        && parsed.path().eq_ignore_ascii_case("/url");
    if !is_wrapper {
        return url.to_string();
    }

    parsed
        .query_pairs()
        .find(|(key, _)| key == "url")
        .map_or_else(|| url.to_string(), |(_, target)| target.into_owned())
}

/// Make a `Location` value absolute.
///
/// Values without scheme and host are resolved against the scheme, host and
/// port of the URL that produced them.
fn absolutize(current: &str, location: &str) -> Result<String> {
    if let Ok(absolute) = Url::parse(location) {
        return Ok(absolute.into());
    }
    let origin = Url::parse(current)?.join("/")?;
    Ok(origin.join(location)?.into())
}
