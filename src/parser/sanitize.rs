//! Text sanitization utilities for cleaning extracted article content
//!
//! Text taken from HTML nodes carries indentation, non-breaking spaces and
//! invisible formatting characters. These helpers turn it into a single
//! clean line suitable for CSV cells and the gallery.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;

// Pre-compiled regex patterns for performance
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Sanitize extracted text content
///
/// 1. Remove zero-width characters
/// 2. Remove control characters
/// 3. Collapse every whitespace run (including newlines and NBSP) to one space
/// 4. Trim
///
/// # Examples
///
/// ```
/// use newsharvest::parser::sanitize::sanitize_text;
///
/// let dirty = "  Điện\u{200B} thoại\n\t mới  ";
/// assert_eq!(sanitize_text(dirty), "Điện thoại mới");
/// ```
pub fn sanitize_text(text: &str) -> String {
    let result = remove_zero_width(text);
    let result = remove_control_chars(&result);
    normalize_whitespace(&result)
}

/// Concatenated, sanitized text of an element and its descendants
pub fn element_text(element: ElementRef<'_>) -> String {
    sanitize_text(&element.text().collect::<String>())
}

/// Remove zero-width spaces and similar invisible characters
///
/// Removes:
/// - \u{200B}-\u{200F} Zero-width space, joiners and direction marks
/// - \u{2028}-\u{202F} Separators and embedding controls
/// - \u{FEFF} Byte order mark (BOM)
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Remove control characters except whitespace controls
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .collect()
}

/// Collapse whitespace runs to a single space and trim
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text.trim(), " ").to_string()
}

/// Check that text has something other than whitespace
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}
