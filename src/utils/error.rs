//! Error types for the newsharvest crawler
//!
//! This module defines the domain error types used by the crawling,
//! image download and storage layers.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (connection, DNS, redirect loop, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Server responded with status {0}")]
    Status(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Header value rejected by the HTTP client
    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl FetchError {
    /// Classify a reqwest error, separating timeouts from other failures
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// Short reason used in skip logs
    pub fn reason(&self) -> String {
        match self {
            Self::Http(e) => format!("transport error: {e}"),
            Self::Status(code) => format!("status {code}"),
            Self::Timeout => "timed out".to_string(),
            Self::Decode(msg) => format!("undecodable body: {msg}"),
            Self::InvalidUrl(url) => format!("invalid url {url}"),
            Self::InvalidHeader(msg) => format!("invalid header: {msg}"),
        }
    }
}

/// Errors that can occur while downloading a lead image
#[derive(Error, Debug)]
pub enum ImageError {
    /// Transport-level failure
    #[error("Image fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// Local file could not be written
    #[error("Image write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the CSV record store and gallery renderer
#[derive(Error, Debug)]
pub enum StorageError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Template registration error
    #[error("Template error: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// Template rendering error
    #[error("Render error: {0}")]
    Render(#[from] handlebars::RenderError),
}

impl StorageError {
    /// Wrap an I/O error with the offending path
    pub fn io(path: impl AsRef<std::path::Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}
