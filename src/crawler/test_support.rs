//! In-memory fetcher for crawler unit tests

use crate::crawler::fetcher::{FetchError, FetchResult, FetchedPage, Fetcher};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

enum Canned {
    Page(String),
    Status(u16),
    Panic,
}

/// Serves canned responses keyed by URL and counts every fetch
pub struct MapFetcher {
    responses: HashMap<String, Canned>,
    calls: Mutex<HashMap<String, usize>>,
    delay: Duration,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.responses.insert(url.to_string(), Canned::Page(html.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status_code: u16) -> Self {
        self.responses.insert(url.to_string(), Canned::Status(status_code));
        self
    }

    pub fn panics_on(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), Canned::Panic);
        self
    }

    /// Sleeps this long inside every fetch so workers overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn max_calls_per_url(&self) -> usize {
        self.calls.lock().unwrap().values().copied().max().unwrap_or(0)
    }
}

#[async_trait]
impl Fetcher for MapFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default() += 1;

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.responses.get(url.as_str()) {
            Some(Canned::Page(html)) => Ok(FetchedPage {
                final_url: url.clone(),
                status_code: 200,
                content_type: "text/html".to_string(),
                body: html.clone(),
            }),
            Some(Canned::Status(status_code)) => Err(FetchError::Status {
                url: url.to_string(),
                status_code: *status_code,
            }),
            Some(Canned::Panic) => panic!("fetcher blew up on {}", url),
            None => Err(FetchError::Connect {
                url: url.to_string(),
                message: "no route".to_string(),
            }),
        }
    }
}
