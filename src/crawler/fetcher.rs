//! HTTP fetcher implementation
//!
//! This module handles all network access for the crawler:
//! - The `Fetcher` trait the workers depend on
//! - Building HTTP clients with proper user agent strings and timeouts
//! - GET requests to fetch page content
//! - Error classification into `FetchError`
//!
//! There is no retry: a failed fetch is final for the lifetime of a crawl.

use crate::config::{CrawlerConfig, UserAgentConfig};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code (always 2xx)
    pub status_code: u16,

    /// Content-Type header value, empty when absent
    pub content_type: String,

    /// Page body content
    pub body: String,
}

/// Why a fetch did not produce a page
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("HTTP {status_code} for {url}")]
    Status { url: String, status_code: u16 },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch {
        url: String,
        status_code: u16,
        content_type: String,
    },

    #[error("Failed to read body of {url}: {message}")]
    Body {
        url: String,
        status_code: u16,
        message: String,
    },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl FetchError {
    /// The HTTP status observed before the failure, or 0 if none was received
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Status { status_code, .. }
            | Self::ContentMismatch { status_code, .. }
            | Self::Body { status_code, .. } => *status_code,
            Self::Timeout { .. } | Self::Connect { .. } | Self::Request { .. } => 0,
        }
    }
}

/// Result of a fetch operation
pub type FetchResult = Result<FetchedPage, FetchError>;

/// Source of page bodies for the crawl workers
///
/// Implementations must be shareable across the worker pool.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches one address
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use sumi_lens::config::{CrawlerConfig, UserAgentConfig};
/// use sumi_lens::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `Fetcher` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from configuration
    pub fn new(crawler: &CrawlerConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(crawler, user_agent)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with HTML (or no) Content-Type | `Ok(FetchedPage)` |
/// | 2xx with another Content-Type | `FetchError::ContentMismatch` |
/// | Any other status | `FetchError::Status` |
/// | Timeout | `FetchError::Timeout` |
/// | Connection refused / DNS / TLS | `FetchError::Connect` |
/// | Body read failure | `FetchError::Body` |
pub async fn fetch_url(client: &Client, url: &Url) -> FetchResult {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(e) => return Err(classify_request_error(url, e)),
    };

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status_code: status.as_u16(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html_content_type(&content_type) {
        return Err(FetchError::ContentMismatch {
            url: url.to_string(),
            status_code: status.as_u16(),
            content_type,
        });
    }

    match response.text().await {
        Ok(body) => Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        }),
        Err(e) => Err(FetchError::Body {
            url: url.to_string(),
            status_code: status.as_u16(),
            message: e.to_string(),
        }),
    }
}

/// Missing Content-Type is treated as HTML
fn is_html_content_type(content_type: &str) -> bool {
    let lowered = content_type.to_ascii_lowercase();
    lowered.is_empty() || lowered.contains("text/html") || lowered.contains("application/xhtml")
}

fn classify_request_error(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if e.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
            message: e.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_fetcher() -> HttpFetcher {
        let crawler = CrawlerConfig {
            request_timeout: 5,
            connect_timeout: 2,
            ..CrawlerConfig::default()
        };
        HttpFetcher::new(&crawler, &UserAgentConfig::default()).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_html_content_type_detection() {
        assert!(is_html_content_type("text/html"));
        assert!(is_html_content_type("text/html; charset=utf-8"));
        assert!(is_html_content_type("application/xhtml+xml"));
        assert!(is_html_content_type(""));
        assert!(!is_html_content_type("application/pdf"));
        assert!(!is_html_content_type("image/png"));
    }

    #[test]
    fn test_status_code_of_errors() {
        let url = "https://example.com/".to_string();
        assert_eq!(FetchError::Timeout { url: url.clone() }.status_code(), 0);
        assert_eq!(
            FetchError::Status {
                url: url.clone(),
                status_code: 404
            }
            .status_code(),
            404
        );
        assert_eq!(
            FetchError::ContentMismatch {
                url,
                status_code: 200,
                content_type: "image/png".to_string()
            }
            .status_code(),
            200
        );
    }

    #[tokio::test]
    async fn test_fetch_html_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><title>Hi</title></html>", "text/html"),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/", server.uri())).unwrap();
        let page = test_fetcher().fetch(&url).await.unwrap();

        assert_eq!(page.status_code, 200);
        assert!(page.body.contains("<title>Hi</title>"));
        assert!(page.content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();
        let err = test_fetcher().fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status_code: 404, .. }));
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_fetch_non_html() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("%PDF-1.4", "application/pdf"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/file.pdf", server.uri())).unwrap();
        let err = test_fetcher().fetch(&url).await.unwrap_err();

        assert!(matches!(err, FetchError::ContentMismatch { .. }));
        assert_eq!(err.status_code(), 200);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let url = Url::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
        let err = test_fetcher().fetch(&url).await.unwrap_err();

        assert_eq!(err.status_code(), 0);
    }
}
