//! Article pipeline: fetch, extract, download image, assemble record
//!
//! ```text
//! ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐
//! │  Fetch   │────▶│ Extract  │────▶│  Image   │────▶│  Record  │
//! │  (HTML)  │     │ (fields) │     │(optional)│     │          │
//! └──────────┘     └──────────┘     └──────────┘     └──────────┘
//! ```
//!
//! Each link is an independent unit of work. A link whose page cannot be
//! fetched or decoded is logged and skipped; the rest of the batch continues.
//! Records come back in the order the links were given, whatever the
//! configured concurrency.

use std::sync::Arc;

use chrono::Local;
use futures::stream::{self, StreamExt};
use scraper::Html;

use crate::config::Config;
use crate::crawler::fetcher::SiteFetcher;
use crate::crawler::image::ImageFetcher;
use crate::crawler::url::UrlResolver;
use crate::models::{ArticleRecord, PipelineStats};
use crate::parser::{ExtractedFields, FieldExtractor};
use crate::utils::error::FetchError;

/// What happened to one link
enum LinkOutcome {
    Record {
        record: ArticleRecord,
        image_failed: bool,
    },
    Skipped,
}

/// Turns article links into records
pub struct ArticlePipeline {
    fetcher: Arc<SiteFetcher>,
    extractor: FieldExtractor,
    images: ImageFetcher,
    resolver: UrlResolver,
    category_name: String,
    concurrency: usize,
}

impl ArticlePipeline {
    /// Create a pipeline for the configured category
    #[must_use]
    pub fn new(fetcher: Arc<SiteFetcher>, images: ImageFetcher, config: &Config) -> Self {
        Self {
            fetcher,
            extractor: FieldExtractor::new(),
            images,
            resolver: UrlResolver::new(config.base_url()),
            category_name: config.site.category_name.clone(),
            concurrency: config.crawler.article_concurrency.max(1),
        }
    }

    /// Process every link and return the records that succeeded, in link order
    pub async fn run(&self, links: &[String]) -> Vec<ArticleRecord> {
        self.run_with_stats(links).await.0
    }

    /// Process every link, also reporting per-run counters
    pub async fn run_with_stats(&self, links: &[String]) -> (Vec<ArticleRecord>, PipelineStats) {
        let outcomes: Vec<LinkOutcome> = stream::iter(links.iter().enumerate())
            .map(|(index, url)| self.process(index + 1, links.len(), url))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut stats = PipelineStats {
            attempted: links.len(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(links.len());

        for outcome in outcomes {
            match outcome {
                LinkOutcome::Record {
                    record,
                    image_failed,
                } => {
                    stats.succeeded += 1;
                    if record.local_image_path.is_some() {
                        stats.images_downloaded += 1;
                    }
                    if image_failed {
                        stats.images_failed += 1;
                    }
                    records.push(record);
                }
                LinkOutcome::Skipped => stats.failed += 1,
            }
        }

        tracing::info!(
            attempted = stats.attempted,
            succeeded = stats.succeeded,
            failed = stats.failed,
            images = stats.images_downloaded,
            "Article pipeline finished"
        );

        (records, stats)
    }

    async fn process(&self, position: usize, total: usize, url: &str) -> LinkOutcome {
        tracing::info!(position, total, url = %url, "Processing article");

        let fields = match self.fetch_fields(url).await {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!(url = %url, reason = %e.reason(), "Skipping article");
                return LinkOutcome::Skipped;
            }
        };

        tracing::debug!(
            url = %url,
            title = %fields.title,
            image_url = fields.image_url.as_deref().unwrap_or(""),
            "Extracted article"
        );

        let (local_image_path, image_failed) = match fields.image_url.as_deref() {
            Some(image_url) => {
                let path = self.images.download(image_url, &fields.title).await;
                let failed = path.is_none();
                (path, failed)
            }
            None => (None, false),
        };

        LinkOutcome::Record {
            record: ArticleRecord {
                category: self.category_name.clone(),
                title: fields.title,
                description: fields.description,
                image_url: fields.image_url,
                local_image_path,
                content: fields.content,
                article_url: url.to_string(),
                scraped_at: Local::now(),
            },
            image_failed,
        }
    }

    async fn fetch_fields(&self, url: &str) -> Result<ExtractedFields, FetchError> {
        let html = self.fetcher.fetch_html(url).await?;
        Ok(self.extract(&html))
    }

    /// Parse and extract synchronously; the document never lives across an await
    fn extract(&self, html: &str) -> ExtractedFields {
        let document = Html::parse_document(html);
        self.extractor.extract(&document, &self.resolver)
    }
}
