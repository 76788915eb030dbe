//! Crawl frontier: visited set, page collection and pending-task queue
//!
//! All shared mutable crawl state lives behind a single mutex so that the
//! membership check, the cap check and the visited insertion happen as one
//! step. The pending queue is a bounded tokio channel whose capacity equals the
//! page cap; since at most `max_pages` tasks are ever admitted, the enqueue
//! under the lock can never find the queue full.
//!
//! # Termination
//!
//! `outstanding` counts admitted tasks whose record has not been resolved yet.
//! Workers admit a page's links before resolving the page itself, so the
//! counter only reaches zero when no more work can appear. When it does, the
//! sender half of the queue is dropped, which closes the channel and lets the
//! idle workers exit.

use crate::crawler::types::{CrawlTask, PageRecord};
use crate::state::SessionState;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{mpsc, Semaphore};
use url::Url;

struct FrontierInner {
    visited: HashSet<Url>,
    pages: Vec<PageRecord>,
    outstanding: usize,
    state: SessionState,
    sender: Option<mpsc::Sender<CrawlTask>>,
}

impl FrontierInner {
    fn advance(&mut self, next: SessionState) {
        match self.state.transition_to(next) {
            Ok(state) => {
                tracing::debug!("Session {} -> {}", self.state, state);
                self.state = state;
            }
            Err(e) => tracing::trace!("Ignoring transition: {}", e),
        }
    }

    /// Moves to `Done` and closes the queue
    fn finish(&mut self) {
        if self.state == SessionState::Running {
            self.advance(SessionState::Draining);
        }
        self.advance(SessionState::Done);
        self.sender.take();
    }
}

/// Shared crawl frontier
pub struct Frontier {
    inner: Mutex<FrontierInner>,
    max_pages: usize,
}

impl Frontier {
    /// Creates an empty frontier and the receiving half of its task queue
    pub fn new(max_pages: usize) -> (Self, mpsc::Receiver<CrawlTask>) {
        let capacity = max_pages.clamp(1, Semaphore::MAX_PERMITS);
        let (sender, receiver) = mpsc::channel(capacity);
        let frontier = Self {
            inner: Mutex::new(FrontierInner {
                visited: HashSet::new(),
                pages: Vec::new(),
                outstanding: 0,
                state: SessionState::Running,
                sender: Some(sender),
            }),
            max_pages,
        };
        (frontier, receiver)
    }

    // Every update finishes before the guard drops, so a poisoned lock is still consistent
    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admits an address as a new task
    ///
    /// The address is admitted iff it has not been seen before, the session is
    /// still running and `collected + outstanding < max_pages`. An admitted
    /// address is marked visited and enqueued before this returns.
    ///
    /// # Returns
    ///
    /// * `true` - A new task was enqueued
    /// * `false` - Duplicate, over the cap, or the session is no longer running
    pub fn admit(&self, address: Url, referrer: Option<&Url>) -> bool {
        let mut inner = self.lock();

        if !inner.state.accepts_work()
            || inner.pages.len() + inner.outstanding >= self.max_pages
            || inner.visited.contains(&address)
        {
            return false;
        }

        let task = CrawlTask {
            address: address.clone(),
            referrer: referrer.cloned(),
        };

        let sent = match &inner.sender {
            Some(sender) => sender.try_send(task).is_ok(),
            None => false,
        };
        if !sent {
            tracing::warn!("Pending queue rejected {}", address);
            return false;
        }

        tracing::trace!("Admitted {}", address);
        inner.visited.insert(address);
        inner.outstanding += 1;
        true
    }

    /// Resolves one dispatched task with its record
    ///
    /// Returns the session state after the resolution.
    pub fn resolve(&self, record: PageRecord) -> SessionState {
        let mut inner = self.lock();

        if inner.pages.len() < self.max_pages {
            inner.pages.push(record);
        } else {
            tracing::warn!("Dropping record for {}: page cap reached", record.url);
        }
        inner.outstanding = inner.outstanding.saturating_sub(1);

        if inner.pages.len() >= self.max_pages && inner.state == SessionState::Running {
            tracing::info!("Page cap of {} reached, draining", self.max_pages);
            inner.advance(SessionState::Draining);
        }

        if inner.outstanding == 0 {
            inner.finish();
        }

        inner.state
    }

    /// Stops the session immediately and closes the queue
    ///
    /// Used when a worker dies; pages collected so far are kept.
    pub fn abort(&self) {
        self.lock().finish();
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn outstanding(&self) -> usize {
        self.lock().outstanding
    }

    /// Number of records collected so far
    pub fn collected(&self) -> usize {
        self.lock().pages.len()
    }

    /// Moves the collected records out of the frontier
    pub fn take_pages(&self) -> Vec<PageRecord> {
        std::mem::take(&mut self.lock().pages)
    }
}
