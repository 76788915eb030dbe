//! Crawl data model
//!
//! Tasks flow from the frontier to the workers; records flow from the workers
//! back into the page collection. Neither is mutated once published.

use crate::config::{validate_max_pages, validate_start_url};
use crate::ConfigError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

/// A validated crawl request
///
/// Construction is the only place seed and page-cap errors are reported; once
/// a request exists the crawl itself cannot fail on its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    start_url: Url,
    max_pages: usize,
}

impl CrawlRequest {
    /// Validates and builds a crawl request
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlRequest)` - `start_url` is an absolute http(s) URL and `max_pages >= 1`
    /// * `Err(ConfigError)` - Either input is invalid
    pub fn new(start_url: &str, max_pages: usize) -> Result<Self, ConfigError> {
        let start_url = validate_start_url(start_url)?;
        validate_max_pages(max_pages)?;
        Ok(Self {
            start_url,
            max_pages,
        })
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
}

/// One unit of crawl work: an address to fetch plus the page that linked to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// The address to fetch (normalized, fragment-free)
    pub address: Url,

    /// The page the address was discovered on; None for the seed
    pub referrer: Option<Url>,
}

/// An `<img>` found on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// The raw `src` attribute (never empty)
    pub src: String,

    /// The raw `alt` attribute, empty when absent
    pub alt: String,
}

/// Immutable snapshot of one page's SEO and structural signals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Page address
    pub url: Url,

    /// The page that linked to this one
    pub referrer: Option<Url>,

    /// HTTP status code, 0 when the fetch failed outright
    pub status_code: u16,

    /// First `<title>` text
    pub title: String,

    /// `<meta name="description">` content
    pub description: String,

    /// `<link rel="canonical">` href, as written
    pub canonical: String,

    /// Heading levels (1-6) in document order
    pub header_levels: Vec<u8>,

    /// Images with a non-empty src
    pub images: Vec<ImageRecord>,

    /// Immediate text of each anchor, in document order
    pub anchor_texts: Vec<String>,

    pub internal_links: usize,
    pub external_links: usize,

    pub has_main: bool,
    pub has_nav: bool,
    pub has_footer: bool,
    pub has_header: bool,

    /// Number of inline `<style>` elements
    pub inline_style_tags: usize,

    /// Number of attribute-less `<script>` elements with a body
    pub inline_script_tags: usize,

    /// Number of `<script type="application/ld+json">` blocks
    pub structured_data_count: usize,

    /// True if a viewport meta tag is present
    pub mobile_friendly: bool,

    /// When the page was fetched
    pub crawled_at: DateTime<Utc>,
}

impl PageRecord {
    /// Creates a record with every extracted field at its empty default
    pub fn empty(url: Url, referrer: Option<Url>, status_code: u16) -> Self {
        Self {
            url,
            referrer,
            status_code,
            title: String::new(),
            description: String::new(),
            canonical: String::new(),
            header_levels: Vec::new(),
            images: Vec::new(),
            anchor_texts: Vec::new(),
            internal_links: 0,
            external_links: 0,
            has_main: false,
            has_nav: false,
            has_footer: false,
            has_header: false,
            inline_style_tags: 0,
            inline_script_tags: 0,
            structured_data_count: 0,
            mobile_friendly: false,
            crawled_at: Utc::now(),
        }
    }

    /// Record for a task whose fetch did not produce a page
    pub fn failed(task: &CrawlTask, status_code: u16) -> Self {
        Self::empty(task.address.clone(), task.referrer.clone(), status_code)
    }

    /// Number of `<h1>` elements
    pub fn h1_count(&self) -> usize {
        self.header_levels.iter().filter(|&&level| level == 1).count()
    }

    /// Number of images without alt text
    pub fn missing_alt_count(&self) -> usize {
        self.images.iter().filter(|img| img.alt.is_empty()).count()
    }

    /// True if the fetch produced a 2xx page
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// True if the fetch failed without any HTTP status
    pub fn is_fetch_failure(&self) -> bool {
        self.status_code == 0
    }
}
