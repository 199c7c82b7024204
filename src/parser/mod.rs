//! HTML parsing and data extraction
//!
//! This module turns listing pages into article links and article pages
//! into structured fields.

pub mod extract;
pub mod listing;
pub mod sanitize;
pub mod selectors;

// Re-export main parsers and public types
pub use extract::{
    ExtractedFields, FieldExtractor, ImageAttr, NO_CONTENT, NO_DESCRIPTION, NO_TITLE,
};
pub use listing::{ListingPage, ListingParser};
