//! Crawling components
//!
//! Everything that talks to the network lives here: the shared fetcher,
//! the listing crawler that discovers article links, the pipeline that turns
//! links into records and the lead image downloader.

pub mod fetcher;
pub mod headers;
pub mod image;
pub mod list;
pub mod pipeline;
pub mod url;

pub use fetcher::SiteFetcher;
pub use image::ImageFetcher;
pub use list::{ListingCrawler, ListingOutcome, ListingState, PageOutcome};
pub use pipeline::ArticlePipeline;
pub use url::UrlResolver;
