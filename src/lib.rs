//! newsharvest - category crawler for the Dantri news site
//!
//! Walks the paginated listing of one news category, fetches every article
//! it links to, extracts title, summary, body and lead image through
//! fallback chains, downloads the lead image and appends the results to a
//! CSV file plus an HTML gallery.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Fetching, listing traversal, article pipeline, images
//! - [`parser`] - HTML parsing and field extraction
//! - [`models`] - Core data structures and types
//! - [`storage`] - CSV record store and HTML gallery
//! - [`scheduler`] - Daily trigger and run loop
//! - [`job`] - One complete crawl run
//! - [`utils`] - Common utilities and domain error types
//!
//! # Example
//!
//! ```no_run
//! use newsharvest::config::Config;
//! use newsharvest::job::CrawlJob;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let job = CrawlJob::new(&config)?;
//!     let summary = job.run().await?;
//!     println!("{} articles", summary.articles.succeeded);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod job;
pub mod models;
pub mod parser;
pub mod scheduler;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{ArticlePipeline, ImageFetcher, ListingCrawler, SiteFetcher, UrlResolver};
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::job::CrawlJob;
    pub use crate::models::{ArticleRecord, PipelineStats, RunOutcome, RunSummary, StopReason};
    pub use crate::parser::FieldExtractor;
    pub use crate::scheduler::{DailyTrigger, Scheduler};
    pub use crate::storage::{GalleryRenderer, RecordStore};
}

// Direct re-exports for convenience
pub use models::{ArticleRecord, RunSummary};
