//! Output persistence
//!
//! Records are appended to a CSV file that accumulates across runs, and the
//! current run is rendered to a standalone HTML gallery.

pub mod gallery;
pub mod records;

pub use gallery::GalleryRenderer;
pub use records::{RecordStore, CSV_HEADER};
