//! Lead image downloader
//!
//! Images are streamed to disk chunk by chunk under a filename derived from
//! the article title. Failures never propagate: the caller gets `None`, a
//! warning is logged and any partially written file is removed.
//!
//! Files are created exclusively. When the derived name is already taken a
//! numeric suffix is added, so a download never overwrites or deletes a file
//! it did not create itself.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::crawler::fetcher::SiteFetcher;
use crate::error::{Error, Result};
use crate::utils::error::ImageError;
use crate::utils::sanitize_filename;

/// Extension used when the URL path does not carry one
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Timestamp suffix keeping same-title downloads apart
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%3f";

/// Numbered variants tried before giving up on a taken filename
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Downloads lead images into a local directory
pub struct ImageFetcher {
    fetcher: Arc<SiteFetcher>,
    image_dir: PathBuf,
}

impl ImageFetcher {
    /// Create a downloader, creating `image_dir` if needed
    ///
    /// # Errors
    ///
    /// Returns a configuration error (`Error::Config`) when the directory
    /// cannot be created, stopping the run before any fetching.
    pub fn new(fetcher: Arc<SiteFetcher>, image_dir: impl Into<PathBuf>) -> Result<Self> {
        let image_dir = image_dir.into();
        std::fs::create_dir_all(&image_dir).map_err(|e| {
            Error::config(format!(
                "cannot create image directory {}: {e}",
                image_dir.display()
            ))
        })?;

        Ok(Self { fetcher, image_dir })
    }

    /// Directory images are written to
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Download an image, returning the local path on success
    ///
    /// An empty `url` returns `None` without issuing a request.
    pub async fn download(&self, url: &str, label: &str) -> Option<PathBuf> {
        let url = url.trim();
        if url.is_empty() {
            return None;
        }

        let file_name = build_filename(label, url);

        match self.fetch_to_disk(url, &file_name).await {
            Ok((path, bytes)) => {
                tracing::debug!(url = %url, path = %path.display(), bytes, "Downloaded image");
                Some(path)
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to download image");
                None
            }
        }
    }

    /// Request the image, then stream it into a freshly created file
    ///
    /// The file only exists once the response status is known to be good.
    /// A body that fails midway removes the file this call created.
    async fn fetch_to_disk(
        &self,
        url: &str,
        file_name: &str,
    ) -> std::result::Result<(PathBuf, u64), ImageError> {
        let mut response = self.fetcher.get(url).await?;
        let (path, mut file) = self.create_unique(file_name).await?;

        match write_body(&mut response, &mut file).await {
            Ok(bytes) => Ok((path, bytes)),
            Err(e) => {
                drop(file);
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(path = %path.display(), error = %remove_err, "Failed to remove partial image");
                }
                Err(e)
            }
        }
    }

    /// Exclusively create `file_name`, or the first free numbered variant of it
    async fn create_unique(&self, file_name: &str) -> std::io::Result<(PathBuf, File)> {
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.image_dir.join(numbered_filename(file_name, attempt));
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free filename for {file_name}"),
        ))
    }
}

async fn write_body(
    response: &mut reqwest::Response,
    file: &mut File,
) -> std::result::Result<u64, ImageError> {
    let mut written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(crate::utils::error::FetchError::from_reqwest)?
    {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

/// `name.ext` for attempt 0, `name_{n}.ext` afterwards
pub fn numbered_filename(file_name: &str, attempt: u32) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    match file_name.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{attempt}.{ext}"),
        None => format!("{file_name}_{attempt}"),
    }
}

/// Build `{sanitized label}_{timestamp}{ext}` for an image URL
pub fn build_filename(label: &str, url: &str) -> String {
    format!(
        "{}_{}{}",
        sanitize_filename(label),
        Local::now().format(TIMESTAMP_FORMAT),
        extension_of(url)
    )
}

/// Lower-cased extension of the URL path including the dot, or [`DEFAULT_EXTENSION`]
pub fn extension_of(url: &str) -> String {
    let path = Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.split(['?', '#']).next().unwrap_or_default().to_string());

    let file_name = path.rsplit('/').next().unwrap_or_default();
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            format!(".{}", ext.to_ascii_lowercase())
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
