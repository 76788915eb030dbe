//! Statistics over a finished crawl
//!
//! This module provides functionality for summarizing the collected page
//! records and displaying the result.

use crate::crawler::PageRecord;
use std::collections::{BTreeMap, HashSet};

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlStatistics {
    /// Total number of page records collected
    pub total_pages: usize,

    /// Pages fetched with a 2xx status
    pub successful_pages: usize,

    /// Pages that answered 4xx
    pub client_errors: usize,

    /// Pages that answered 5xx
    pub server_errors: usize,

    /// Pages that never produced a status (network failure, timeout)
    pub fetch_failures: usize,

    /// Count of pages by HTTP status code (0 for fetch failures)
    pub pages_by_status: BTreeMap<u16, usize>,

    /// Number of distinct hosts among the collected pages
    pub unique_hosts: usize,

    pub internal_links: usize,
    pub external_links: usize,

    pub total_images: usize,
    pub images_missing_alt: usize,

    /// Pages with at least one ld+json block
    pub pages_with_structured_data: usize,

    /// Pages with a viewport meta tag
    pub mobile_friendly_pages: usize,
}

impl CrawlStatistics {
    /// Computes statistics from the collected records
    pub fn from_pages(pages: &[PageRecord]) -> Self {
        let mut stats = Self {
            total_pages: pages.len(),
            ..Self::default()
        };
        let mut hosts = HashSet::new();

        for page in pages {
            *stats.pages_by_status.entry(page.status_code).or_insert(0) += 1;

            match page.status_code {
                0 => stats.fetch_failures += 1,
                200..=299 => stats.successful_pages += 1,
                400..=499 => stats.client_errors += 1,
                500..=599 => stats.server_errors += 1,
                _ => {}
            }

            if let Some(host) = page.url.host_str() {
                hosts.insert(host.to_string());
            }

            stats.internal_links += page.internal_links;
            stats.external_links += page.external_links;
            stats.total_images += page.images.len();
            stats.images_missing_alt += page.missing_alt_count();

            if page.structured_data_count > 0 {
                stats.pages_with_structured_data += 1;
            }
            if page.mobile_friendly {
                stats.mobile_friendly_pages += 1;
            }
        }

        stats.unique_hosts = hosts.len();
        stats
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.successful_pages as f64 / self.total_pages as f64) * 100.0
    }

    /// Returns the share of non-2xx pages as a percentage
    pub fn error_rate(&self) -> f64 {
        if self.total_pages == 0 {
            return 0.0;
        }
        ((self.total_pages - self.successful_pages) as f64 / self.total_pages as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Total pages collected: {}", stats.total_pages);
    println!("  Unique hosts: {}", stats.unique_hosts);
    println!(
        "  Links found: {} internal, {} external",
        stats.internal_links, stats.external_links
    );
    println!(
        "  Images: {} ({} missing alt text)",
        stats.total_images, stats.images_missing_alt
    );
    println!(
        "  Structured data on {} pages, mobile friendly: {} pages",
        stats.pages_with_structured_data, stats.mobile_friendly_pages
    );
    println!();

    println!("Pages by Status:");
    // Sort statuses by count (descending)
    let mut status_counts: Vec<_> = stats.pages_by_status.iter().collect();
    status_counts.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));

    for (status, count) in status_counts {
        let percentage = if stats.total_pages > 0 {
            (*count as f64 / stats.total_pages as f64) * 100.0
        } else {
            0.0
        };
        let label = if *status == 0 {
            "unreachable".to_string()
        } else {
            status.to_string()
        };
        println!("  {}: {} ({:.1}%)", label, count, percentage);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} pages fetched successfully)",
        stats.success_rate(),
        stats.successful_pages,
        stats.total_pages
    );
}
