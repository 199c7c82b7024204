//! One crawl run: listing, article pipeline, CSV append, gallery
//!
//! Component construction is where fatal problems surface (unusable
//! headers, an image directory that cannot be created). Once the run is
//! under way only storage failures abort it; everything else is absorbed
//! per page or per article.

use std::sync::Arc;

use chrono::Local;

use crate::config::Config;
use crate::crawler::{ArticlePipeline, ImageFetcher, ListingCrawler, SiteFetcher};
use crate::error::Result;
use crate::models::{RunOutcome, RunSummary, SCRAPED_AT_FORMAT};
use crate::storage::{GalleryRenderer, RecordStore};

/// A fully wired crawl for one category
pub struct CrawlJob {
    category_name: String,
    listing: ListingCrawler,
    pipeline: ArticlePipeline,
    store: RecordStore,
    gallery: GalleryRenderer<'static>,
}

impl CrawlJob {
    /// Build every component from the configuration
    ///
    /// The CSV file is created with its header here so it exists before the
    /// first successful run.
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = Arc::new(SiteFetcher::new(config)?);
        let images = ImageFetcher::new(Arc::clone(&fetcher), &config.output.image_dir)?;

        let store = RecordStore::new(&config.output.csv_path);
        store.ensure_header()?;

        Ok(Self {
            category_name: config.site.category_name.clone(),
            listing: ListingCrawler::new(Arc::clone(&fetcher), config),
            pipeline: ArticlePipeline::new(fetcher, images, config),
            store,
            gallery: GalleryRenderer::new(
                &config.output.gallery_path,
                config.output.placeholder_image.clone(),
            )?,
        })
    }

    /// Execute one run and summarize it
    pub async fn run(&self) -> Result<RunSummary> {
        let started_at = Local::now();
        tracing::info!(
            category = %self.category_name,
            started_at = %started_at.format(SCRAPED_AT_FORMAT),
            "Starting crawl job"
        );

        let listing = self.listing.crawl().await;
        let (records, stats) = self.pipeline.run_with_stats(&listing.links).await;

        if records.is_empty() {
            tracing::warn!(category = %self.category_name, "No articles collected, skipping output");
        } else {
            self.store.append(&records)?;
            self.gallery.write(&self.category_name, &records)?;
        }

        let summary = RunSummary {
            category: self.category_name.clone(),
            pages_fetched: listing.pages_fetched,
            pages_failed: listing.pages_failed,
            stop_reason: listing.stop_reason,
            links_discovered: listing.links.len(),
            articles: stats,
            started_at,
            finished_at: Local::now(),
        };

        let outcome = summary.outcome();
        let elapsed = summary.finished_at - summary.started_at;
        let finished_at = summary.finished_at.format(SCRAPED_AT_FORMAT);
        match outcome {
            RunOutcome::NoArticles => tracing::warn!(
                links = summary.links_discovered,
                finished_at = %finished_at,
                elapsed_secs = elapsed.num_seconds(),
                "Crawl job finished without articles"
            ),
            RunOutcome::Partial | RunOutcome::Complete => tracing::info!(
                outcome = ?outcome,
                links = summary.links_discovered,
                records = summary.articles.succeeded,
                failed = summary.articles.failed,
                finished_at = %finished_at,
                elapsed_secs = elapsed.num_seconds(),
                "Crawl job finished"
            ),
        }

        Ok(summary)
    }
}
