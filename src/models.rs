// Core data structures for the newsharvest crawler

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// Timestamp format used in every persisted and rendered record
pub const SCRAPED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One extracted article, ready for persistence and rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub category: String,
    pub title: String,
    pub description: String,
    /// Absolute lead image URL, if any image was found
    pub image_url: Option<String>,
    /// Downloaded copy of the lead image; only set when the file exists
    pub local_image_path: Option<PathBuf>,
    pub content: String,
    pub article_url: String,
    pub scraped_at: DateTime<Local>,
}

impl ArticleRecord {
    /// Scrape time rendered with [`SCRAPED_AT_FORMAT`]
    pub fn scraped_at_display(&self) -> String {
        self.scraped_at.format(SCRAPED_AT_FORMAT).to_string()
    }

    /// Local image path as a string, empty when there is none
    pub fn local_image_display(&self) -> String {
        self.local_image_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default()
    }
}

/// Why listing traversal ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// A listing page matched no article nodes
    NoArticles,
    /// A listing page had no "next page" affordance
    NoNextPage,
    /// The configured page ceiling was reached
    PageLimit,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoArticles => write!(f, "no articles on page"),
            Self::NoNextPage => write!(f, "no next page"),
            Self::PageLimit => write!(f, "page limit reached"),
        }
    }
}

/// Counters for one pipeline run over a batch of links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub images_downloaded: usize,
    pub images_failed: usize,
}

/// Overall verdict of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Nothing was collected
    NoArticles,
    /// Some records were produced, some units failed
    Partial,
    /// Every discovered article produced a record
    Complete,
}

/// Summary of one full crawl run (listing + pipeline)
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub category: String,
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub stop_reason: StopReason,
    pub links_discovered: usize,
    pub articles: PipelineStats,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl RunSummary {
    /// Classify the run
    pub fn outcome(&self) -> RunOutcome {
        if self.articles.succeeded == 0 {
            RunOutcome::NoArticles
        } else if self.pages_failed > 0
            || self.articles.failed > 0
            || self.articles.images_failed > 0
        {
            RunOutcome::Partial
        } else {
            RunOutcome::Complete
        }
    }
}
