//! HTML gallery of one run's records, rendered with Handlebars
//!
//! Every render overwrites the previous page. Values are HTML-escaped by
//! the Handlebars default escape function.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use handlebars::Handlebars;
use serde::Serialize;

use crate::models::{ArticleRecord, SCRAPED_AT_FORMAT};
use crate::utils::error::StorageError;

/// Default gallery template
const GALLERY_TEMPLATE: &str = include_str!("../../templates/gallery.hbs");

const TEMPLATE_NAME: &str = "gallery";

/// Template data for one card
#[derive(Debug, Serialize)]
struct CardData {
    image: String,
    title: String,
    url: String,
    description: String,
    scraped_time: String,
}

impl CardData {
    fn from_record(record: &ArticleRecord, placeholder: &str) -> Self {
        let image = record
            .local_image_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| placeholder.to_string());

        Self {
            image,
            title: record.title.clone(),
            url: record.article_url.clone(),
            description: record.description.clone(),
            scraped_time: record.scraped_at_display(),
        }
    }
}

/// Template data for the whole page
#[derive(Debug, Serialize)]
struct GalleryData {
    category: String,
    generated_at: String,
    count: usize,
    cards: Vec<CardData>,
}

/// Renders the gallery page
pub struct GalleryRenderer<'a> {
    handlebars: Handlebars<'a>,
    path: PathBuf,
    placeholder_image: String,
}

impl<'a> GalleryRenderer<'a> {
    /// Create a renderer writing to `path`
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Template` if the built-in template is invalid
    pub fn new(
        path: impl Into<PathBuf>,
        placeholder_image: impl Into<String>,
    ) -> Result<Self, StorageError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_template_string(TEMPLATE_NAME, GALLERY_TEMPLATE)?;

        Ok(Self {
            handlebars,
            path: path.into(),
            placeholder_image: placeholder_image.into(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render records to an HTML string
    pub fn render(&self, category: &str, records: &[ArticleRecord]) -> Result<String, StorageError> {
        let data = GalleryData {
            category: category.to_string(),
            generated_at: Local::now().format(SCRAPED_AT_FORMAT).to_string(),
            count: records.len(),
            cards: records
                .iter()
                .map(|r| CardData::from_record(r, &self.placeholder_image))
                .collect(),
        };

        Ok(self.handlebars.render(TEMPLATE_NAME, &data)?)
    }

    /// Render records and overwrite the gallery file
    pub fn write(&self, category: &str, records: &[ArticleRecord]) -> Result<(), StorageError> {
        let html = self.render(category, records)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        fs::write(&self.path, html).map_err(|e| StorageError::io(&self.path, e))?;

        tracing::info!(path = %self.path.display(), cards = records.len(), "Wrote gallery");
        Ok(())
    }
}
