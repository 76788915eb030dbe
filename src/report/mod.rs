//! Report module for turning a crawl into something a person can act on
//!
//! This module handles:
//! - Per-page SEO analysis and site-wide duplicate detection
//! - Plain text and markdown reports of that analysis
//! - CSV and JSON export of the raw page records
//! - Crawl statistics

mod analysis;
mod export;
mod markdown;
pub mod stats;
mod text;

pub use analysis::{analyze, DuplicateGroup, Finding, PageReport, Severity, SiteReport};
pub use export::{export_csv, export_csv_string, fix_suggestions, write_json, CSV_HEADERS};
pub use markdown::{format_markdown_report, write_markdown_report};
pub use stats::{print_statistics, CrawlStatistics};
pub use text::format_report;

use thiserror::Error;

/// Errors that can occur while writing reports
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;
