//! SEO analysis of collected page records
//!
//! Content checks only run on pages that were fetched successfully; a page
//! that failed gets a single broken-link or fetch-failure finding instead.

use crate::crawler::PageRecord;
use std::collections::HashMap;
use std::fmt;
use url::Url;

/// Inline `<style>` or `<script>` count above which a page is flagged
const INLINE_TAG_THRESHOLD: usize = 5;

/// Keywords shorter than this many characters are never flagged
const MIN_KEYWORD_CHARS: usize = 4;

/// Occurrences across title and description above which a keyword is flagged
const KEYWORD_REPEAT_THRESHOLD: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// A single problem found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// `<main>`, `<nav>`, `<footer>` or `<header>` is absent
    MissingLandmark(&'static str),
    EmptyAnchors(usize),
    MissingAlt(usize),
    DuplicateAlt { alt: String, count: usize },
    BrokenLink { status_code: u16, referrer: Option<Url> },
    FetchFailed { referrer: Option<Url> },
    MissingTitle,
    MissingDescription,
    MissingH1,
    MultipleH1(usize),
    MissingCanonical,
    SkippedHeading { from: u8, to: u8 },
    ExcessInlineStyles(usize),
    ExcessInlineScripts(usize),
    NoStructuredData,
    OverusedKeyword { word: String, count: usize },
}

impl Finding {
    pub fn severity(&self) -> Severity {
        match self {
            Self::BrokenLink { .. } | Self::FetchFailed { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }
}

fn referrer_label(referrer: &Option<Url>) -> String {
    referrer
        .as_ref()
        .map_or_else(|| "start page".to_string(), Url::to_string)
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingLandmark(tag) => write!(f, "Missing <{}> element", tag),
            Self::EmptyAnchors(n) => write!(f, "{} anchor tags missing link text", n),
            Self::MissingAlt(n) => write!(f, "{} image(s) missing alt text", n),
            Self::DuplicateAlt { alt, count } => {
                write!(f, "Duplicate alt text {:?} used {} times", alt, count)
            }
            Self::BrokenLink {
                status_code,
                referrer,
            } => write!(
                f,
                "Broken link ({}) from {}",
                status_code,
                referrer_label(referrer)
            ),
            Self::FetchFailed { referrer } => {
                write!(f, "Fetch failed, linked from {}", referrer_label(referrer))
            }
            Self::MissingTitle => f.write_str("Missing <title>"),
            Self::MissingDescription => f.write_str("Missing meta description"),
            Self::MissingH1 => f.write_str("Missing <h1>"),
            Self::MultipleH1(n) => write!(f, "Multiple <h1> tags ({})", n),
            Self::MissingCanonical => f.write_str("Missing canonical tag"),
            Self::SkippedHeading { from, to } => {
                write!(f, "Skipped heading level from <h{}> to <h{}>", from, to)
            }
            Self::ExcessInlineStyles(n) => write!(f, "High number of inline <style> tags: {}", n),
            Self::ExcessInlineScripts(n) => {
                write!(f, "High number of inline <script> tags: {}", n)
            }
            Self::NoStructuredData => f.write_str("No structured data (ld+json) found"),
            Self::OverusedKeyword { word, count } => write!(
                f,
                "Overused keyword {:?} ({} times) in title/meta",
                word, count
            ),
        }
    }
}

/// Analysis of one page
#[derive(Debug, Clone)]
pub struct PageReport {
    pub url: Url,
    pub status_code: u16,
    pub title: String,
    pub description: String,
    pub internal_links: usize,
    pub external_links: usize,
    pub findings: Vec<Finding>,
}

/// Pages sharing the same title or description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub value: String,
    pub urls: Vec<Url>,
}

/// Analysis of a whole crawl
#[derive(Debug, Clone, Default)]
pub struct SiteReport {
    pub pages: Vec<PageReport>,
    pub duplicate_titles: Vec<DuplicateGroup>,
    pub duplicate_descriptions: Vec<DuplicateGroup>,
}

impl SiteReport {
    pub fn total_findings(&self) -> usize {
        self.pages.iter().map(|p| p.findings.len()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.findings)
            .filter(|f| f.severity() == Severity::Error)
            .count()
    }
}

/// Analyzes every page and looks for duplicated titles and descriptions
pub fn analyze(pages: &[PageRecord]) -> SiteReport {
    SiteReport {
        pages: pages.iter().map(analyze_page).collect(),
        duplicate_titles: find_duplicates(pages, |p| &p.title),
        duplicate_descriptions: find_duplicates(pages, |p| &p.description),
    }
}

fn analyze_page(page: &PageRecord) -> PageReport {
    let findings = if page.is_fetch_failure() {
        vec![Finding::FetchFailed {
            referrer: page.referrer.clone(),
        }]
    } else if page.status_code >= 400 {
        vec![Finding::BrokenLink {
            status_code: page.status_code,
            referrer: page.referrer.clone(),
        }]
    } else {
        content_findings(page)
    };

    PageReport {
        url: page.url.clone(),
        status_code: page.status_code,
        title: page.title.clone(),
        description: page.description.clone(),
        internal_links: page.internal_links,
        external_links: page.external_links,
        findings,
    }
}

fn content_findings(page: &PageRecord) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (present, tag) in [
        (page.has_main, "main"),
        (page.has_nav, "nav"),
        (page.has_footer, "footer"),
        (page.has_header, "header"),
    ] {
        if !present {
            findings.push(Finding::MissingLandmark(tag));
        }
    }

    let empty_anchors = page
        .anchor_texts
        .iter()
        .filter(|t| t.trim().is_empty())
        .count();
    if empty_anchors > 0 {
        findings.push(Finding::EmptyAnchors(empty_anchors));
    }

    let missing_alt = page.missing_alt_count();
    if missing_alt > 0 {
        findings.push(Finding::MissingAlt(missing_alt));
    }
    findings.extend(duplicate_alts(page));

    if page.title.is_empty() {
        findings.push(Finding::MissingTitle);
    }
    if page.description.is_empty() {
        findings.push(Finding::MissingDescription);
    }
    match page.h1_count() {
        0 => findings.push(Finding::MissingH1),
        1 => {}
        n => findings.push(Finding::MultipleH1(n)),
    }
    if page.canonical.is_empty() {
        findings.push(Finding::MissingCanonical);
    }

    if let Some((from, to)) = first_skipped_heading(&page.header_levels) {
        findings.push(Finding::SkippedHeading { from, to });
    }

    if page.inline_style_tags > INLINE_TAG_THRESHOLD {
        findings.push(Finding::ExcessInlineStyles(page.inline_style_tags));
    }
    if page.inline_script_tags > INLINE_TAG_THRESHOLD {
        findings.push(Finding::ExcessInlineScripts(page.inline_script_tags));
    }
    if page.structured_data_count == 0 {
        findings.push(Finding::NoStructuredData);
    }

    findings.extend(
        overused_keywords(&page.title, &page.description)
            .into_iter()
            .map(|(word, count)| Finding::OverusedKeyword { word, count }),
    );

    findings
}

/// Non-empty alt texts used more than once, in first-seen order
fn duplicate_alts(page: &PageRecord) -> Vec<Finding> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for image in page.images.iter().filter(|img| !img.alt.is_empty()) {
        let count = counts.entry(image.alt.as_str()).or_insert(0);
        if *count == 0 {
            order.push(image.alt.as_str());
        }
        *count += 1;
    }

    order
        .into_iter()
        .filter_map(|alt| match counts[alt] {
            count if count > 1 => Some(Finding::DuplicateAlt {
                alt: alt.to_string(),
                count,
            }),
            _ => None,
        })
        .collect()
}

/// The first place a heading is more than one level deeper than the previous one
pub(crate) fn first_skipped_heading(levels: &[u8]) -> Option<(u8, u8)> {
    levels
        .windows(2)
        .find(|pair| pair[1] > pair[0] + 1)
        .map(|pair| (pair[0], pair[1]))
}

/// Words of 4+ characters repeated more than twice, sorted
fn overused_keywords(title: &str, description: &str) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in extract_words(title).chain(extract_words(description)) {
        *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    }

    let mut overused: Vec<(String, usize)> = counts
        .into_iter()
        .filter(|(word, count)| {
            *count > KEYWORD_REPEAT_THRESHOLD && word.chars().count() >= MIN_KEYWORD_CHARS
        })
        .collect();
    overused.sort();
    overused
}

fn extract_words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// Groups pages by a non-empty field, keeping groups with more than one page
fn find_duplicates<F>(pages: &[PageRecord], field: F) -> Vec<DuplicateGroup>
where
    F: Fn(&PageRecord) -> &String,
{
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for page in pages {
        let value = field(page);
        if value.is_empty() {
            continue;
        }
        match index.get(value.as_str()) {
            Some(&i) => groups[i].urls.push(page.url.clone()),
            None => {
                index.insert(value.as_str(), groups.len());
                groups.push(DuplicateGroup {
                    value: value.clone(),
                    urls: vec![page.url.clone()],
                });
            }
        }
    }

    groups.retain(|g| g.urls.len() > 1);
    groups
}
