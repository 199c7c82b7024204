//! Article field extraction with per-field fallback chains
//!
//! Markup on the source site is inconsistent: some articles lazy-load their
//! images, some use responsive `srcset`, some put the lead image inside the
//! body instead of a figure. Each field is therefore extracted by walking an
//! ordered list of strategies and keeping the first non-empty result. A miss
//! is never an error; text fields fall back to sentinels and the lead image
//! to `None`.

use scraper::{ElementRef, Html, Selector};

use crate::crawler::url::{pick_from_srcset, UrlResolver};
use crate::parser::sanitize::{element_text, has_content};
use crate::parser::selectors::{ArticleSelectors, ImageSelectors};

/// Title used when no title heading is found
pub const NO_TITLE: &str = "Không có tiêu đề";

/// Description used when no summary block is found
pub const NO_DESCRIPTION: &str = "Không có mô tả";

/// Content used when the body container is missing or has no paragraphs
pub const NO_CONTENT: &str = "Không có nội dung";

/// Image attribute consulted when looking for a lead image URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageAttr {
    /// `data-src`, used by lazy-loading scripts
    LazySrc,
    /// `srcset`, reduced to its last candidate
    SrcSet,
    /// Plain `src`
    Src,
}

impl ImageAttr {
    /// Read this attribute from an image node; blank values count as absent
    pub fn read(self, img: ElementRef<'_>) -> Option<String> {
        let value = match self {
            Self::LazySrc => img.value().attr("data-src")?.trim().to_string(),
            Self::SrcSet => pick_from_srcset(img.value().attr("srcset")?),
            Self::Src => img.value().attr("src")?.trim().to_string(),
        };
        has_content(&value).then_some(value)
    }
}

/// Attribute priority for images found in a figure or the body
const FULL_PRIORITY: &[ImageAttr] = &[ImageAttr::LazySrc, ImageAttr::SrcSet, ImageAttr::Src];

/// Attribute priority for the document-wide scan
const SCAN_PRIORITY: &[ImageAttr] = &[ImageAttr::LazySrc, ImageAttr::Src];

/// How many nodes of a tier's scope are inspected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan {
    /// Only the first matching node; if it has no usable attribute the tier misses
    FirstNode,
    /// Every matching node in document order until one has a usable attribute
    AllNodes,
}

/// One step of the lead image fallback chain
pub struct ImageTier {
    pub name: &'static str,
    pub scope: &'static Selector,
    pub priority: &'static [ImageAttr],
    pub scan: Scan,
}

impl ImageTier {
    /// Run this tier against a document
    pub fn find(&self, document: &Html) -> Option<String> {
        let mut nodes = document.select(self.scope);
        match self.scan {
            Scan::FirstNode => nodes.next().and_then(|img| self.read(img)),
            Scan::AllNodes => nodes.find_map(|img| self.read(img)),
        }
    }

    fn read(&self, img: ElementRef<'_>) -> Option<String> {
        self.priority.iter().find_map(|attr| attr.read(img))
    }
}

/// Fields extracted from one article document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFields {
    pub title: String,
    pub description: String,
    pub content: String,
    /// Absolute lead image URL
    pub image_url: Option<String>,
}

/// Extracts article fields from a parsed document
pub struct FieldExtractor {
    article: ArticleSelectors,
    image_tiers: Vec<ImageTier>,
}

impl FieldExtractor {
    #[must_use]
    pub fn new() -> Self {
        let images = ImageSelectors::new();
        Self {
            article: ArticleSelectors::new(),
            image_tiers: vec![
                ImageTier {
                    name: "figure",
                    scope: images.figure,
                    priority: FULL_PRIORITY,
                    scan: Scan::FirstNode,
                },
                ImageTier {
                    name: "content",
                    scope: images.content,
                    priority: FULL_PRIORITY,
                    scan: Scan::FirstNode,
                },
                ImageTier {
                    name: "document",
                    scope: images.any,
                    priority: SCAN_PRIORITY,
                    scan: Scan::AllNodes,
                },
            ],
        }
    }

    /// Extract every field of an article
    pub fn extract(&self, document: &Html, resolver: &UrlResolver) -> ExtractedFields {
        ExtractedFields {
            title: self.extract_title(document),
            description: self.extract_summary(document),
            content: self.extract_body(document),
            image_url: self.extract_lead_image_url(document, resolver),
        }
    }

    /// Article headline, or [`NO_TITLE`]
    pub fn extract_title(&self, document: &Html) -> String {
        first_text(document, self.article.title).unwrap_or_else(|| NO_TITLE.to_string())
    }

    /// Summary block, or [`NO_DESCRIPTION`]
    pub fn extract_summary(&self, document: &Html) -> String {
        first_text(document, self.article.summary).unwrap_or_else(|| NO_DESCRIPTION.to_string())
    }

    /// Body paragraphs joined by newlines, or [`NO_CONTENT`]
    pub fn extract_body(&self, document: &Html) -> String {
        self.article
            .content
            .iter()
            .find_map(|selector| {
                let container = document.select(selector).next()?;
                let paragraphs: Vec<String> = container
                    .select(self.article.paragraph)
                    .map(element_text)
                    .filter(|text| has_content(text))
                    .collect();
                (!paragraphs.is_empty()).then(|| paragraphs.join("\n"))
            })
            .unwrap_or_else(|| NO_CONTENT.to_string())
    }

    /// Lead image URL resolved to an absolute URL
    ///
    /// # Fallback Order
    /// 1. First image inside a figure: `data-src`, `srcset`, `src`
    /// 2. First image inside the body: `data-src`, `srcset`, `src`
    /// 3. Any image in the document: `data-src`, `src`
    pub fn extract_lead_image_url(&self, document: &Html, resolver: &UrlResolver) -> Option<String> {
        self.image_tiers.iter().find_map(|tier| {
            let found = tier.find(document)?;
            tracing::trace!(tier = tier.name, url = %found, "Lead image candidate");
            Some(resolver.resolve(&found))
        })
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Text of the first node, across an ordered selector list, that has content
fn first_text(document: &Html, selectors: &[Selector]) -> Option<String> {
    selectors.iter().find_map(|selector| {
        document
            .select(selector)
            .next()
            .map(element_text)
            .filter(|text| has_content(text))
    })
}
