//! Category listing crawler with pagination support
//!
//! Traversal is a small state machine per run:
//!
//! ```text
//! FetchingPage(n) ──fetch ok──▶ ExtractingLinks ──▶ Continuing ──▶ FetchingPage(n+1)
//!        │                            │
//!        └─fetch failed: skip page    └─▶ Stopping (no items / no next page)
//! ```
//!
//! The page ceiling bounds the loop regardless of what the pages say.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::Config;
use crate::crawler::fetcher::SiteFetcher;
use crate::crawler::url::UrlResolver;
use crate::models::StopReason;
use crate::parser::{ListingPage, ListingParser};

/// State of one listing traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingState {
    /// About to request page `n`
    FetchingPage(u32),
    /// Page `n` fetched, links being extracted
    ExtractingLinks(u32),
    /// Move on to page `n`
    Continuing(u32),
    /// Traversal is over
    Stopping(StopReason),
}

/// Result of fetching one listing page
#[derive(Debug)]
pub enum PageOutcome {
    Fetched(ListingPage),
    Failed,
}

/// Result of one listing traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingOutcome {
    /// Absolute article links in discovery order, without repeats
    pub links: Vec<String>,
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub stop_reason: StopReason,
}

/// Category listing crawler
pub struct ListingCrawler {
    fetcher: Arc<SiteFetcher>,
    resolver: UrlResolver,
    parser: ListingParser,
    category_slug: String,
    max_pages: u32,
}

impl ListingCrawler {
    /// Create a listing crawler for the configured category
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use newsharvest::config::Config;
    /// use newsharvest::crawler::fetcher::SiteFetcher;
    /// use newsharvest::crawler::list::ListingCrawler;
    ///
    /// let config = Config::default();
    /// let fetcher = Arc::new(SiteFetcher::new(&config).unwrap());
    /// let crawler = ListingCrawler::new(fetcher, &config);
    /// ```
    #[must_use]
    pub fn new(fetcher: Arc<SiteFetcher>, config: &Config) -> Self {
        Self {
            fetcher,
            resolver: UrlResolver::new(config.base_url()),
            parser: ListingParser::new(),
            category_slug: config.site.category_slug.clone(),
            max_pages: config.crawler.max_pages,
        }
    }

    /// Listing URL for a page number
    ///
    /// Page 1 is `{base}{slug}.htm`, later pages `{base}{slug}/trang-{n}.htm`.
    pub fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            self.resolver.resolve(&format!("{}.htm", self.category_slug))
        } else {
            self.resolver
                .resolve(&format!("{}/trang-{page}.htm", self.category_slug))
        }
    }

    /// Collect article links across listing pages
    pub async fn collect_links(&self) -> Vec<String> {
        self.crawl().await.links
    }

    /// Walk the listing pages and report what was found
    ///
    /// Failed page fetches are logged and skipped; they never abort the
    /// traversal. The outcome is returned whatever the stop reason.
    pub async fn crawl(&self) -> ListingOutcome {
        let mut links = Vec::new();
        let mut seen = HashSet::new();
        let mut pages_fetched = 0;
        let mut pages_failed = 0;
        let mut state = ListingState::FetchingPage(1);

        let mut pending: Option<ListingPage> = None;

        let stop_reason = loop {
            state = match state {
                ListingState::FetchingPage(page) if page > self.max_pages => {
                    tracing::debug!(page, max_pages = self.max_pages, "Reached maximum pages limit");
                    ListingState::Stopping(StopReason::PageLimit)
                }
                ListingState::FetchingPage(page) => match self.fetch_page(page).await {
                    PageOutcome::Fetched(listing) => {
                        pages_fetched += 1;
                        pending = Some(listing);
                        ListingState::ExtractingLinks(page)
                    }
                    PageOutcome::Failed => {
                        pages_failed += 1;
                        next_page(page)
                    }
                },
                ListingState::ExtractingLinks(page) => {
                    let listing = pending.take().unwrap_or_default();
                    self.on_page(page, listing, &mut links, &mut seen)
                }
                ListingState::Continuing(page) => ListingState::FetchingPage(page),
                ListingState::Stopping(reason) => break reason,
            };
        };

        tracing::info!(
            category = %self.category_slug,
            total_links = links.len(),
            pages_fetched,
            pages_failed,
            stop_reason = %stop_reason,
            "Completed link collection"
        );

        ListingOutcome {
            links,
            pages_fetched,
            pages_failed,
            stop_reason,
        }
    }

    /// Fetch and parse one listing page
    async fn fetch_page(&self, page: u32) -> PageOutcome {
        let url = self.page_url(page);
        tracing::info!(page, url = %url, "Fetching listing page");

        match self.fetcher.fetch_html(&url).await {
            Ok(html) => PageOutcome::Fetched(self.parser.parse(&html, &self.resolver)),
            Err(e) => {
                tracing::warn!(page, url = %url, reason = %e.reason(), "Skipping listing page");
                PageOutcome::Failed
            }
        }
    }

    /// Decide what follows a successfully fetched page
    fn on_page(
        &self,
        page: u32,
        listing: ListingPage,
        links: &mut Vec<String>,
        seen: &mut HashSet<String>,
    ) -> ListingState {
        if listing.item_count == 0 {
            tracing::info!(page, "No articles found on page, stopping pagination");
            return ListingState::Stopping(StopReason::NoArticles);
        }

        let found = listing.links.len();
        for link in listing.links {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }

        tracing::info!(
            page,
            items = listing.item_count,
            found,
            total = links.len(),
            has_next = listing.has_next,
            "Processed listing page"
        );

        if listing.has_next {
            next_page(page)
        } else {
            tracing::info!(page, "No next page link, stopping pagination");
            ListingState::Stopping(StopReason::NoNextPage)
        }
    }
}

/// Move past `page`, stopping at the page limit if the counter is exhausted
fn next_page(page: u32) -> ListingState {
    page.checked_add(1)
        .map_or(ListingState::Stopping(StopReason::PageLimit), ListingState::Continuing)
}
