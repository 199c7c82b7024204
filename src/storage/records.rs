//! Append-only CSV record store
//!
//! The file starts with a UTF-8 byte order mark so spreadsheet tools pick
//! the right encoding. The header row is written only when the file is new
//! or empty; every later write appends rows.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::models::ArticleRecord;
use crate::utils::error::StorageError;

/// UTF-8 byte order mark
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Column order of the CSV file
pub const CSV_HEADER: [&str; 8] = [
    "category",
    "title",
    "description",
    "image_url",
    "local_image",
    "content",
    "article_url",
    "scraped_time",
];

/// One CSV row, fields in [`CSV_HEADER`] order
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    category: &'a str,
    title: &'a str,
    description: &'a str,
    image_url: &'a str,
    local_image: String,
    content: &'a str,
    article_url: &'a str,
    scraped_time: String,
}

impl<'a> From<&'a ArticleRecord> for CsvRow<'a> {
    fn from(record: &'a ArticleRecord) -> Self {
        Self {
            category: &record.category,
            title: &record.title,
            description: &record.description,
            image_url: record.image_url.as_deref().unwrap_or_default(),
            local_image: record.local_image_display(),
            content: &record.content,
            article_url: &record.article_url,
            scraped_time: record.scraped_at_display(),
        }
    }
}

/// CSV file that only ever grows
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Create a store for `path`; nothing is touched until the first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure the file exists and starts with the header row
    ///
    /// Existing content is left alone.
    pub fn ensure_header(&self) -> Result<(), StorageError> {
        let file = self.open()?;
        if self.is_empty(&file)? {
            self.write_header(file)?;
            tracing::info!(path = %self.path.display(), "Created CSV file with header");
        }
        Ok(())
    }

    /// Append records, returning how many rows were written
    ///
    /// An empty batch writes nothing.
    pub fn append(&self, records: &[ArticleRecord]) -> Result<usize, StorageError> {
        if records.is_empty() {
            tracing::info!(path = %self.path.display(), "No records to append");
            return Ok(0);
        }

        let mut file = self.open()?;
        if self.is_empty(&file)? {
            file = self.write_header(file)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for record in records {
            writer.serialize(CsvRow::from(record))?;
        }
        writer
            .flush()
            .map_err(|e| StorageError::io(&self.path, e))?;

        tracing::info!(
            path = %self.path.display(),
            rows = records.len(),
            "Appended records to CSV"
        );
        Ok(records.len())
    }

    fn open(&self) -> Result<File, StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| StorageError::io(&self.path, e))
    }

    fn is_empty(&self, file: &File) -> Result<bool, StorageError> {
        let metadata = file
            .metadata()
            .map_err(|e| StorageError::io(&self.path, e))?;
        Ok(metadata.len() == 0)
    }

    fn write_header(&self, mut file: File) -> Result<File, StorageError> {
        file.write_all(UTF8_BOM)
            .map_err(|e| StorageError::io(&self.path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.write_record(CSV_HEADER)?;

        writer
            .into_inner()
            .map_err(|e| StorageError::io(&self.path, e.into_error()))
    }
}
