//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `Fetcher` trait
//! - HTML signal extraction and link discovery
//! - The shared frontier (visited set, page cap, pending queue)
//! - The worker pool and session coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod types;
mod worker;

#[cfg(test)]
mod test_support;

pub use coordinator::{crawl, crawl_with_config, start_crawl, Session, DEFAULT_WORKERS};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchResult, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::Frontier;
pub use parser::extract_page;
pub use types::{CrawlRequest, CrawlTask, ImageRecord, PageRecord};
pub use worker::{process, TaskOutcome};
