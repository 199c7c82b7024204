use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use crate::utils::error::FetchError;

/// Build browser-like headers sent with every page and image request
///
/// # Arguments
///
/// * `user_agent` - User agent string (typically a desktop browser UA)
/// * `accept_language` - Accept-Language value matching the site language
///
/// # Errors
///
/// Returns `FetchError::InvalidHeader` when a value contains characters that
/// are not allowed in a header.
///
/// # Examples
///
/// ```
/// use newsharvest::crawler::headers::build_site_headers;
///
/// let headers = build_site_headers(
///     "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
///     "vi-VN,vi;q=0.9",
/// )
/// .unwrap();
/// assert!(headers.contains_key("accept-language"));
/// ```
pub fn build_site_headers(user_agent: &str, accept_language: &str) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();

    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent)
            .map_err(|e| FetchError::InvalidHeader(format!("user agent: {e}")))?,
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(accept_language)
            .map_err(|e| FetchError::InvalidHeader(format!("accept-language: {e}")))?,
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );

    Ok(headers)
}
