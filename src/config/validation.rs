use crate::config::types::{Config, CrawlerConfig, ServerConfig, UserAgentConfig};
use crate::ConfigError;
use std::net::SocketAddr;
use url::Url;

/// Upper bound on the worker pool size
const MAX_WORKERS: usize = 100;

/// Upper bound on the page cap of a single crawl
pub const MAX_PAGES: usize = 100_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates a crawl seed address
///
/// The seed must be an absolute `http` or `https` URL with a host. Anything
/// else is rejected before the crawl starts.
///
/// # Returns
///
/// * `Ok(Url)` - The parsed seed
/// * `Err(ConfigError)` - The seed is not a crawlable absolute URL
pub fn validate_start_url(start_url: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(start_url.trim())
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' must use http or https, got {}",
            start_url,
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!(
            "Start URL '{}' has no host",
            start_url
        )));
    }

    Ok(url)
}

/// Validates a page cap
///
/// The cap must be between 1 and [`MAX_PAGES`].
pub fn validate_max_pages(max_pages: usize) -> Result<(), ConfigError> {
    if max_pages < 1 || max_pages > MAX_PAGES {
        return Err(ConfigError::Validation(format!(
            "max_pages must be between 1 and {}, got {}",
            MAX_PAGES, max_pages
        )));
    }
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    validate_max_pages(config.max_pages)?;
    validate_workers(config.workers)?;

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout must be >= 1s, got {}s",
            config.connect_timeout
        )));
    }

    Ok(())
}

/// Validates the worker pool size
pub(crate) fn validate_workers(workers: usize) -> Result<(), ConfigError> {
    if workers < 1 || workers > MAX_WORKERS {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and {}, got {}",
            MAX_WORKERS, workers
        )));
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates HTTP API configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid bind_address '{}': {}",
            config.bind_address, e
        ))
    })?;

    validate_max_pages(config.default_max_pages)
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
