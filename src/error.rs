//! Unified error handling for the newsharvest crate
//!
//! Domain-specific errors live next to the code that raises them; this
//! module folds them into a single [`Error`] so that fatal conditions can be
//! carried to the process boundary, while the crawl itself absorbs
//! recoverable failures at the smallest unit of work.
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors

use std::io;
use thiserror::Error;

pub use crate::scheduler::error::SchedulerError;
pub use crate::utils::error::{FetchError, ImageError, StorageError};

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout)
    Network,
    /// Decoding and data extraction errors
    Parsing,
    /// Storage and I/O errors
    Storage,
    /// Configuration and validation errors
    Config,
    /// Scheduler and timing errors
    Scheduler,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Storage => "storage",
            Self::Config => "config",
            Self::Scheduler => "scheduler",
        };
        f.write_str(name)
    }
}

/// Unified error type for the newsharvest crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Lead image download errors
    #[error("Image error: {0}")]
    Image(#[from] ImageError),

    /// Record store and gallery errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Scheduler and timing errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the failure only affects one unit of work (page, article, image)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(_) | Self::Image(_) => true,
            Self::Storage(_) | Self::Io(_) | Self::Config(_) => false,
            Self::Scheduler(e) => e.is_recoverable(),
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(FetchError::Decode(_)) => ErrorCategory::Parsing,
            Self::Fetch(_) | Self::Image(ImageError::Fetch(_)) => ErrorCategory::Network,
            Self::Image(ImageError::Io(_)) | Self::Storage(_) | Self::Io(_) => {
                ErrorCategory::Storage
            }
            Self::Scheduler(_) => ErrorCategory::Scheduler,
            Self::Config(_) => ErrorCategory::Config,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
