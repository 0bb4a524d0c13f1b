//! Bounded frontier queue with crawl completion detection
//!
//! Workers take URLs out through a [`FrontierLease`]. While a lease is alive
//! its URL counts as in flight, and any links it discovers are pushed before
//! the lease is dropped. The crawl is complete once the queue is empty and
//! nothing is in flight; at that point every waiting worker is woken and
//! `next` returns `None` to all of them.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<String>,
    in_flight: usize,
    done: bool,
    warned_full: bool,
}

/// Bounded multi-producer, multi-consumer URL queue
///
/// `push` waits while the queue holds `capacity` entries. That ceiling is
/// hard: if every worker is pushing into a full queue, they all stall.
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    capacity: usize,
    changed: Notify,
}

impl Frontier {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            capacity: capacity.max(1),
            changed: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a URL, waiting while the queue is full
    pub async fn push(&self, url: String) {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if state.queue.len() < self.capacity {
                    state.queue.push_back(url);
                    drop(state);
                    self.changed.notify_waiters();
                    return;
                }

                if !state.warned_full {
                    state.warned_full = true;
                    tracing::warn!(
                        "Frontier is full ({} URLs); discovery waits for free space",
                        self.capacity
                    );
                }
            }

            notified.await;
        }
    }

    /// Takes the next URL, or `None` once the crawl is complete
    ///
    /// Waits while the queue is empty but other leases are still alive,
    /// since they may push more work.
    pub async fn next(&self) -> Option<FrontierLease<'_>> {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();
                if let Some(url) = state.queue.pop_front() {
                    state.in_flight += 1;
                    drop(state);
                    self.changed.notify_waiters();
                    return Some(FrontierLease {
                        frontier: self,
                        url,
                    });
                }

                if state.done || state.in_flight == 0 {
                    state.done = true;
                    drop(state);
                    self.changed.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    fn finish(&self) {
        let mut state = self.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
        if state.in_flight == 0 && state.queue.is_empty() {
            state.done = true;
        }
        drop(state);
        self.changed.notify_waiters();
    }

    /// Number of queued (not in-flight) URLs
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().queue.is_empty()
    }

    /// Number of URLs currently being processed
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Whether completion has been observed
    pub fn is_done(&self) -> bool {
        self.lock().done
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// A dequeued URL that stays in flight until dropped
#[derive(Debug)]
pub struct FrontierLease<'a> {
    frontier: &'a Frontier,
    url: String,
}

impl FrontierLease<'_> {
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for FrontierLease<'_> {
    fn drop(&mut self) {
        self.frontier.finish();
    }
}
