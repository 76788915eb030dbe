//! Configuration module for Sumi-Lens
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All keys are optional; command-line flags override whatever the file sets.
//!
//! # Example
//!
//! ```no_run
//! use sumi_lens::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lens.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, ServerConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_max_pages, validate_start_url, MAX_PAGES};
pub(crate) use validation::validate_workers;
