//! HTML page extractor
//!
//! One depth-first walk over the parsed document, in document order, fills a
//! `SignalAccumulator`; the accumulator is then frozen into a `PageRecord`.
//! The walk uses an explicit stack so no state is captured by closures.
//!
//! Extraction never fails. html5ever repairs whatever markup it is given and
//! any signal that is not structurally present stays at its empty default.

use crate::crawler::types::{ImageRecord, PageRecord};
use crate::url::{resolve_link, LinkScope};
use scraper::{Html, Node};
use url::Url;

/// Signals collected during the walk
#[derive(Debug, Default)]
struct SignalAccumulator {
    title: Option<String>,
    description: Option<String>,
    canonical: Option<String>,
    header_levels: Vec<u8>,
    images: Vec<ImageRecord>,
    anchor_texts: Vec<String>,
    links: Vec<Url>,
    internal_links: usize,
    external_links: usize,
    has_main: bool,
    has_nav: bool,
    has_footer: bool,
    has_header: bool,
    inline_style_tags: usize,
    inline_script_tags: usize,
    structured_data_count: usize,
    mobile_friendly: bool,
}

impl SignalAccumulator {
    fn into_record(self, base_url: &Url) -> (PageRecord, Vec<Url>) {
        let record = PageRecord {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            canonical: self.canonical.unwrap_or_default(),
            header_levels: self.header_levels,
            images: self.images,
            anchor_texts: self.anchor_texts,
            internal_links: self.internal_links,
            external_links: self.external_links,
            has_main: self.has_main,
            has_nav: self.has_nav,
            has_footer: self.has_footer,
            has_header: self.has_header,
            inline_style_tags: self.inline_style_tags,
            inline_script_tags: self.inline_script_tags,
            structured_data_count: self.structured_data_count,
            mobile_friendly: self.mobile_friendly,
            ..PageRecord::empty(base_url.clone(), None, 200)
        };
        (record, self.links)
    }
}

/// Extracts SEO signals and outbound links from an HTML page
///
/// The returned record carries `base_url` as its address, no referrer and
/// status 200; the worker fills in the fetch-specific fields.
///
/// # Extraction Rules
///
/// - title: first `<title>` outside inline SVG, trimmed
/// - description: first `<meta name="description">` content
/// - canonical: first `<link rel="canonical">` href, as written
/// - headings: every `<h1>`..`<h6>` level in document order
/// - images: every `<img>` with a non-empty src, alt defaulting to empty
/// - anchors: every `<a>`'s immediate text; an `href`, when present, is
///   resolved against `base_url` and, if it is an http(s) link, counted
///   internal/external and returned as an outbound link
/// - landmarks: `<main>`, `<nav>`, `<footer>`, `<header>` presence
/// - `<style>` count, inline `<script>` count (no attributes, non-empty
///   body), `<script type="application/ld+json">` count
/// - `<meta name="viewport">` marks the page mobile friendly
///
/// # Example
///
/// ```
/// use sumi_lens::crawler::extract_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let (record, links) = extract_page(html, &base_url);
/// assert_eq!(record.title, "Test");
/// assert_eq!(links[0].as_str(), "https://example.com/page");
/// ```
pub fn extract_page(html: &str, base_url: &Url) -> (PageRecord, Vec<Url>) {
    let document = Html::parse_document(html);
    let mut acc = SignalAccumulator::default();

    let mut stack = vec![document.tree.root()];
    while let Some(node) = stack.pop() {
        if let Node::Element(element) = node.value() {
            let text = || direct_text(node.children().filter_map(|c| c.value().as_text().map(|t| &**t)));

            match element.name() {
                "a" => {
                    acc.anchor_texts.push(text());
                    if let Some(href) = element.attr("href") {
                        if let Some(link) = resolve_link(href, base_url) {
                            match LinkScope::classify(base_url, &link) {
                                LinkScope::Internal => acc.internal_links += 1,
                                LinkScope::External => acc.external_links += 1,
                            }
                            acc.links.push(link);
                        }
                    }
                }
                "title" => {
                    let in_svg = node.ancestors().any(|a| {
                        a.value()
                            .as_element()
                            .map_or(false, |e| e.name() == "svg")
                    });
                    if acc.title.is_none() && !in_svg {
                        acc.title = Some(text());
                    }
                }
                "meta" => {
                    let name = element.attr("name").map(str::trim).unwrap_or("");
                    if name.eq_ignore_ascii_case("description") && acc.description.is_none() {
                        acc.description = Some(element.attr("content").unwrap_or("").to_string());
                    } else if name.eq_ignore_ascii_case("viewport") {
                        acc.mobile_friendly = true;
                    }
                }
                "link" => {
                    let is_canonical = element.attr("rel").map_or(false, |rel| {
                        rel.split_ascii_whitespace()
                            .any(|token| token.eq_ignore_ascii_case("canonical"))
                    });
                    if is_canonical && acc.canonical.is_none() {
                        if let Some(href) = element.attr("href") {
                            acc.canonical = Some(href.trim().to_string());
                        }
                    }
                }
                "h1" => acc.header_levels.push(1),
                "h2" => acc.header_levels.push(2),
                "h3" => acc.header_levels.push(3),
                "h4" => acc.header_levels.push(4),
                "h5" => acc.header_levels.push(5),
                "h6" => acc.header_levels.push(6),
                "img" => {
                    let src = element.attr("src").map(str::trim).unwrap_or("");
                    if !src.is_empty() {
                        acc.images.push(ImageRecord {
                            src: src.to_string(),
                            alt: element.attr("alt").unwrap_or("").to_string(),
                        });
                    }
                }
                "main" => acc.has_main = true,
                "nav" => acc.has_nav = true,
                "footer" => acc.has_footer = true,
                "header" => acc.has_header = true,
                "style" => acc.inline_style_tags += 1,
                "script" => {
                    let is_ld_json = element.attr("type").map_or(false, |t| {
                        t.trim().eq_ignore_ascii_case("application/ld+json")
                    });
                    if is_ld_json {
                        acc.structured_data_count += 1;
                    } else if element.attrs().next().is_none() && !text().is_empty() {
                        acc.inline_script_tags += 1;
                    }
                }
                _ => {}
            }
        }

        // Reverse so the first child is popped next
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev());
    }

    acc.into_record(base_url)
}

/// Joins the direct text children of an element and trims the result
fn direct_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts.collect::<String>().trim().to_string()
}
