//! HTTP fetcher with request spacing and charset-aware decoding
//!
//! This module provides the single HTTP entry point used by the listing
//! crawler, the article pipeline and the image downloader:
//! - Fixed user agent and Accept-Language headers
//! - Client-side request spacing with governor
//! - Redirect following and a fixed per-request timeout
//! - Charset detection from the Content-Type header via encoding_rs
//!
//! Failed requests are never retried; callers decide what a failure means
//! for their unit of work.

use crate::config::Config;
use crate::crawler::headers::build_site_headers;
use crate::utils::error::FetchError;
use encoding_rs::{Encoding, UTF_8};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{redirect::Policy, Client, Response};
use std::num::NonZeroU32;
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed per request
const MAX_REDIRECTS: usize = 10;

/// HTTP fetcher shared by every crawl component
pub struct SiteFetcher {
    /// HTTP client with default headers, timeout and compression
    client: Client,

    /// Optional limiter spacing out requests
    rate_limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl SiteFetcher {
    /// Create a fetcher from the crawler configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidHeader` for unusable header values and
    /// `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Self::with_settings(
            &config.site.user_agent,
            &config.site.accept_language,
            config.request_timeout(),
            config.crawler.requests_per_second,
        )
    }

    /// Create a fetcher with explicit settings
    ///
    /// # Arguments
    ///
    /// * `user_agent` - User agent sent with every request
    /// * `accept_language` - Accept-Language sent with every request
    /// * `timeout` - Per-request timeout
    /// * `requests_per_second` - Request spacing, `0` disables the limiter
    pub fn with_settings(
        user_agent: &str,
        accept_language: &str,
        timeout: Duration,
        requests_per_second: u32,
    ) -> Result<Self, FetchError> {
        let headers = build_site_headers(user_agent, accept_language)?;

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .build()?;

        let rate_limiter = NonZeroU32::new(requests_per_second)
            .map(|rate| RateLimiter::direct(Quota::per_second(rate)));

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Send a GET request and require a success status
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for an unparseable URL,
    /// `FetchError::Timeout` on timeout, `FetchError::Status` on a non-2xx
    /// response and `FetchError::Http` for any other transport failure
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        tracing::debug!(url = %url, "Fetching URL");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response)
    }

    /// Fetch a page and decode its body to text
    pub async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self.get(url).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await.map_err(FetchError::from_reqwest)?;

        decode_bytes(&bytes, &content_type)
    }
}

/// Decode a response body using the charset named in `content_type`
///
/// Unknown or absent charsets fall back to UTF-8.
///
/// # Errors
///
/// Returns `FetchError::Decode` when the body is not valid in the declared
/// charset and not valid UTF-8 either
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
    let encoding = charset_label(content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, _, had_errors) = encoding.decode(bytes);
    if !had_errors {
        return Ok(text.into_owned());
    }

    if encoding != UTF_8 {
        let (text, _, had_errors) = UTF_8.decode(bytes);
        if !had_errors {
            return Ok(text.into_owned());
        }
    }

    Err(FetchError::Decode(format!(
        "body is not valid {}",
        encoding.name()
    )))
}

/// Extract the `charset=` parameter of a Content-Type value
fn charset_label(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"').to_ascii_lowercase())
        } else {
            None
        }
    })
}
