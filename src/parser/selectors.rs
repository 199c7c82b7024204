//! CSS selectors for the category listing and article pages
//!
//! Every field is described by an ordered list of selectors; extraction code
//! walks the list and keeps the first selector that produces content.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    // Article fields
    static ref TITLE: Vec<Selector> = vec![parse_selector!("h1.title-page")];

    static ref SUMMARY: Vec<Selector> = vec![parse_selector!("div.singular-sapo")];

    static ref CONTENT: Vec<Selector> = vec![parse_selector!("div.singular-content")];

    static ref PARAGRAPH: Selector = parse_selector!("p");

    // Lead image tiers
    static ref FIGURE_IMAGE: Selector =
        parse_selector!("figure.singular-image img, figure.e-img img");

    static ref CONTENT_IMAGE: Selector =
        parse_selector!("div.singular-content img, div.article-content img");

    static ref ANY_IMAGE: Selector = parse_selector!("img[src], img[data-src]");

    // Listing pages
    static ref LISTING_ITEMS: Vec<Selector> = vec![
        parse_selector!("article.article-item"),
        parse_selector!("div.article"),
        parse_selector!("div.news-item"),
    ];

    static ref ITEM_LINK: Selector = parse_selector!("a[href]");

    static ref NEXT_PAGE: Selector = parse_selector!("a.next, a.page-next");
}

/// Selectors for the fields of an article page
pub struct ArticleSelectors {
    pub title: &'static [Selector],
    pub summary: &'static [Selector],
    pub content: &'static [Selector],
    pub paragraph: &'static Selector,
}

impl ArticleSelectors {
    pub fn new() -> Self {
        Self {
            title: &TITLE,
            summary: &SUMMARY,
            content: &CONTENT,
            paragraph: &PARAGRAPH,
        }
    }
}

impl Default for ArticleSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Scopes searched, in order, for the lead image
pub struct ImageSelectors {
    pub figure: &'static Selector,
    pub content: &'static Selector,
    pub any: &'static Selector,
}

impl ImageSelectors {
    pub fn new() -> Self {
        Self {
            figure: &FIGURE_IMAGE,
            content: &CONTENT_IMAGE,
            any: &ANY_IMAGE,
        }
    }
}

impl Default for ImageSelectors {
    fn default() -> Self {
        Self::new()
    }
}

/// Selectors for category listing pages
pub struct ListingSelectors {
    /// Candidate selectors for article teaser nodes, tried in order
    pub items: &'static [Selector],
    /// Link inside a teaser node
    pub link: &'static Selector,
    /// "Next page" affordance
    pub next_page: &'static Selector,
}

impl ListingSelectors {
    pub fn new() -> Self {
        Self {
            items: &LISTING_ITEMS,
            link: &ITEM_LINK,
            next_page: &NEXT_PAGE,
        }
    }
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self::new()
    }
}
