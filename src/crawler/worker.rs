//! Crawl workers
//!
//! Each worker pulls one task at a time from the shared queue, fetches and
//! extracts it, offers the discovered links to the frontier and then resolves
//! the task. A worker exits when the queue is closed.

use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_page;
use crate::crawler::types::{CrawlTask, PageRecord};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use url::Url;

/// Everything a worker shares with the rest of the pool
#[derive(Clone)]
pub struct WorkerContext {
    pub frontier: Arc<Frontier>,
    pub fetcher: Arc<dyn Fetcher>,
    pub queue: Arc<Mutex<mpsc::Receiver<CrawlTask>>>,
}

/// Result of processing one task
#[derive(Debug)]
pub enum TaskOutcome {
    /// Page fetched and extracted
    Completed { record: PageRecord, links: Vec<Url> },

    /// Fetch failed; the record carries the observed status (0 if none)
    Failed { record: PageRecord, error: FetchError },
}

impl TaskOutcome {
    pub fn record(&self) -> &PageRecord {
        match self {
            Self::Completed { record, .. } | Self::Failed { record, .. } => record,
        }
    }
}

/// Fetches and extracts a single task
pub async fn process(fetcher: &dyn Fetcher, task: &CrawlTask) -> TaskOutcome {
    match fetcher.fetch(&task.address).await {
        Ok(page) => {
            // Links resolve and classify against where the page actually lives.
            // After a cross-host redirect the record still carries the requested
            // address, so its internal/external counts refer to the final host.
            let (record, links) = extract_page(&page.body, &page.final_url);
            let record = PageRecord {
                url: task.address.clone(),
                referrer: task.referrer.clone(),
                status_code: page.status_code,
                ..record
            };
            TaskOutcome::Completed { record, links }
        }
        Err(error) => TaskOutcome::Failed {
            record: PageRecord::failed(task, error.status_code()),
            error,
        },
    }
}

/// Runs one worker until the queue closes
///
/// Returns the number of tasks this worker resolved.
pub async fn run_worker(id: usize, ctx: WorkerContext) -> usize {
    tracing::debug!("Worker {} started", id);
    let mut processed = 0;

    loop {
        // Hold the receiver lock only while waiting for the next task
        let task = {
            let mut queue = ctx.queue.lock().await;
            queue.recv().await
        };
        let Some(task) = task else {
            break;
        };

        tracing::debug!("Worker {} fetching {}", id, task.address);
        let outcome = process(ctx.fetcher.as_ref(), &task).await;

        let record = match outcome {
            TaskOutcome::Completed { record, links } => {
                let admitted = links
                    .into_iter()
                    .filter(|link| ctx.frontier.admit(link.clone(), Some(&task.address)))
                    .count();
                tracing::debug!(
                    "Worker {} processed {} (status {}, {} new links)",
                    id,
                    task.address,
                    record.status_code,
                    admitted
                );
                record
            }
            TaskOutcome::Failed { record, error } => {
                tracing::warn!("Worker {} failed on {}: {}", id, task.address, error);
                record
            }
        };

        let state = ctx.frontier.resolve(record);
        processed += 1;
        tracing::trace!("Worker {} resolved task, session {}", id, state);
    }

    tracing::debug!("Worker {} exiting after {} tasks", id, processed);
    processed
}
