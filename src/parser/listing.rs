//! Category listing page parsing
//!
//! A listing page enumerates teaser nodes, each wrapping a link to one
//! article, and optionally a "next page" link.

use scraper::Html;

use crate::crawler::url::UrlResolver;
use crate::parser::selectors::ListingSelectors;

/// What one listing page contains
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Number of teaser nodes matched by the winning selector
    pub item_count: usize,
    /// Absolute article links, in document order
    pub links: Vec<String>,
    /// Whether a "next page" affordance is present
    pub has_next: bool,
}

/// Parses category listing pages
pub struct ListingParser {
    selectors: ListingSelectors,
}

impl ListingParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            selectors: ListingSelectors::new(),
        }
    }

    /// Parse a listing page
    ///
    /// The first item selector that matches anything is used for the whole
    /// page. Teaser nodes without a link are counted but contribute no link.
    pub fn parse(&self, html: &str, resolver: &UrlResolver) -> ListingPage {
        let document = Html::parse_document(html);

        let items = self.selectors.items.iter().find_map(|selector| {
            let nodes: Vec<_> = document.select(selector).collect();
            (!nodes.is_empty()).then_some(nodes)
        });

        let Some(items) = items else {
            return ListingPage::default();
        };

        let links = items
            .iter()
            .filter_map(|item| item.select(self.selectors.link).next())
            .filter_map(|anchor| anchor.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(|href| resolver.resolve(href))
            .collect();

        ListingPage {
            item_count: items.len(),
            links,
            has_next: document.select(self.selectors.next_page).next().is_some(),
        }
    }
}

impl Default for ListingParser {
    fn default() -> Self {
        Self::new()
    }
}
