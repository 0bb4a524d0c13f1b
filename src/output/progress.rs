use crate::crawler::Coordinator;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Background ticker that logs a counter snapshot at a fixed interval
///
/// Purely observational: it only reads the counters and the frontier length.
#[derive(Debug)]
pub struct ProgressReporter {
    handle: JoinHandle<()>,
}

impl ProgressReporter {
    /// Starts reporting; the first line appears after one full `every`
    pub fn spawn(coordinator: Arc<Coordinator>, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + every, every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let frontier = coordinator.frontier();
                tracing::info!(
                    "{} | queued: {:6} | in flight: {:3}",
                    coordinator.counters().snapshot(),
                    frontier.len(),
                    frontier.in_flight()
                );
            }
        });

        Self { handle }
    }

    /// Stops the ticker
    pub fn stop(self) {
        self.handle.abort();
    }
}
