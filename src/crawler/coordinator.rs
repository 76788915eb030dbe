//! Crawl coordinator - session orchestration
//!
//! This module wires a fixed pool of workers to the shared frontier:
//! - Seeding the frontier with the start address
//! - Spawning the worker pool
//! - Waiting until every dispatched task has resolved
//! - Handing the finished page collection back to the caller
//!
//! Shutdown is driven entirely by the frontier's outstanding-work counter;
//! the coordinator never closes the queue itself unless a worker dies.

use crate::config::{validate_workers, Config};
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::types::{CrawlRequest, PageRecord};
use crate::crawler::worker::{run_worker, WorkerContext};
use crate::url::normalize_url;
use crate::LensError;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Default size of the worker pool
pub const DEFAULT_WORKERS: usize = 5;

/// One crawl session
pub struct Session {
    request: CrawlRequest,
    fetcher: Arc<dyn Fetcher>,
    workers: usize,
}

impl Session {
    /// Creates a new session
    ///
    /// # Arguments
    ///
    /// * `request` - The validated seed and page cap
    /// * `fetcher` - Source of page bodies, shared by every worker
    /// * `workers` - Pool size (1-100)
    ///
    /// # Returns
    ///
    /// * `Ok(Session)` - Ready to run
    /// * `Err(LensError)` - The pool size is out of range
    pub fn new(
        request: CrawlRequest,
        fetcher: Arc<dyn Fetcher>,
        workers: usize,
    ) -> Result<Self, LensError> {
        validate_workers(workers)?;
        Ok(Self {
            request,
            fetcher,
            workers,
        })
    }

    /// Runs the session to completion
    ///
    /// This method:
    /// 1. Seeds the frontier with the start address
    /// 2. Spawns the worker pool
    /// 3. Joins every worker; they exit once the frontier closes the queue
    /// 4. Returns the records in the order their fetches completed
    ///
    /// Individual fetch failures never fail the session. A panicking worker
    /// does: the frontier is aborted so the rest of the pool can exit, and
    /// `LensError::Worker` is returned.
    pub async fn run(self) -> Result<Vec<PageRecord>, LensError> {
        let start_time = Instant::now();
        let seed = normalize_url(self.request.start_url().as_str())?;

        tracing::info!(
            "Starting crawl of {} (max {} pages, {} workers)",
            seed,
            self.request.max_pages(),
            self.workers
        );

        let (frontier, receiver) = Frontier::new(self.request.max_pages());
        let frontier = Arc::new(frontier);

        if !frontier.admit(seed.clone(), None) {
            return Err(LensError::Frontier(format!("Seed {} was not admitted", seed)));
        }

        let ctx = WorkerContext {
            frontier: Arc::clone(&frontier),
            fetcher: Arc::clone(&self.fetcher),
            queue: Arc::new(Mutex::new(receiver)),
        };

        let mut workers = JoinSet::new();
        for id in 0..self.workers {
            workers.spawn(run_worker(id, ctx.clone()));
        }
        drop(ctx);

        let mut failure = None;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(processed) => tracing::trace!("Worker joined after {} tasks", processed),
                Err(e) => {
                    tracing::error!("Worker task failed: {}", e);
                    frontier.abort();
                    failure.get_or_insert_with(|| e.to_string());
                }
            }
        }

        if let Some(message) = failure {
            return Err(LensError::Worker(message));
        }

        let pages = frontier.take_pages();
        tracing::info!(
            "Crawl completed: {} pages collected in {:?} (session {})",
            pages.len(),
            start_time.elapsed(),
            frontier.state()
        );

        Ok(pages)
    }
}

/// Crawls a site with the default HTTP fetcher and pool size
///
/// # Example
///
/// ```no_run
/// # async fn example() -> Result<(), sumi_lens::LensError> {
/// let pages = sumi_lens::crawl("https://example.com/", 10).await?;
/// println!("{} pages", pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(start_url: &str, max_pages: usize) -> Result<Vec<PageRecord>, LensError> {
    let config = Config::default();
    let request = CrawlRequest::new(start_url, max_pages)?;
    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent)?;
    Session::new(request, Arc::new(fetcher), DEFAULT_WORKERS)?
        .run()
        .await
}

/// Crawls a site using the HTTP and pool settings from `config`
pub async fn crawl_with_config(
    config: &Config,
    start_url: &str,
    max_pages: usize,
) -> Result<Vec<PageRecord>, LensError> {
    let request = CrawlRequest::new(start_url, max_pages)?;
    let fetcher = HttpFetcher::new(&config.crawler, &config.user_agent)?;
    Session::new(request, Arc::new(fetcher), config.crawler.workers)?
        .run()
        .await
}

/// Blocking crawl entry point
///
/// Builds its own runtime and blocks the caller until the session is done.
/// Must not be called from inside an async context.
pub fn start_crawl(start_url: &str, max_pages: usize) -> Result<Vec<PageRecord>, LensError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(crawl(start_url, max_pages))
}
