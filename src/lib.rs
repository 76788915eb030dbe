//! Sumi-Lens: a concurrent SEO site auditor
//!
//! This crate crawls a website from a seed address with a fixed pool of
//! workers, bounded by a maximum page count, and turns every fetched page into
//! an immutable record of SEO and structural signals. The collected records
//! feed the analyzer, the CSV exporter, the CLI and the HTTP API.

pub mod config;
pub mod crawler;
pub mod report;
pub mod server;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Lens operations
#[derive(Debug, Error)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid session transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::SessionState,
        to: state::SessionState,
    },

    #[error("Frontier error: {0}")]
    Frontier(String),

    #[error("Worker task failed: {0}")]
    Worker(String),

    #[error("Report error: {0}")]
    Report(#[from] report::ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Sumi-Lens operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, start_crawl, CrawlRequest, ImageRecord, PageRecord};
pub use state::SessionState;
pub use url::{is_internal, normalize_url, resolve_link};
