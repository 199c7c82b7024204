//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

/// Maximum number of characters kept from a label when building a filename
pub const MAX_FILENAME_STEM: usize = 50;

/// Make a label safe for use as a filename stem
///
/// Every character that is not alphanumeric becomes `_`, and the result is
/// cut to [`MAX_FILENAME_STEM`] characters.
pub fn sanitize_filename(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(MAX_FILENAME_STEM)
        .collect()
}
