use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide crawl totals shared by every worker
///
/// Each total is an independent atomic; a snapshot is not a consistent cut
/// across all four, which is fine for progress reporting.
#[derive(Debug, Default)]
pub struct CrawlCounters {
    discovered: AtomicU64,
    fetched_ok: AtomicU64,
    failed: AtomicU64,
    garbage: AtomicU64,
}

impl CrawlCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// A new in-domain link won the dedup race
    pub fn record_discovered(&self) {
        self.discovered.fetch_add(1, Ordering::Relaxed);
    }

    /// A page was fetched, or served from the cache
    pub fn record_fetched(&self) {
        self.fetched_ok.fetch_add(1, Ordering::Relaxed);
    }

    /// A storage, parse or sidecar step failed
    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// A fetch errored or returned something other than HTML
    pub fn record_garbage(&self) {
        self.garbage.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CrawlStatistics {
        CrawlStatistics {
            discovered: self.discovered.load(Ordering::Relaxed),
            fetched_ok: self.fetched_ok.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            garbage: self.garbage.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`CrawlCounters`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    pub discovered: u64,
    pub fetched_ok: u64,
    pub failed: u64,
    pub garbage: u64,
}

impl fmt::Display for CrawlStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "discovered: {:6} | ok: {:6} | failed: {:6} | garbage: {:6}",
            self.discovered, self.fetched_ok, self.failed, self.garbage
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_counters_start_at_zero() {
        assert_eq!(CrawlCounters::new().snapshot(), CrawlStatistics::default());
    }

    #[test]
    fn test_counters_are_independent() {
        let counters = CrawlCounters::new();
        counters.record_discovered();
        counters.record_discovered();
        counters.record_fetched();
        counters.record_garbage();

        assert_eq!(
            counters.snapshot(),
            CrawlStatistics {
                discovered: 2,
                fetched_ok: 1,
                failed: 0,
                garbage: 1,
            }
        );
    }

    #[test]
    fn test_concurrent_increments_are_not_lost() {
        let counters = Arc::new(CrawlCounters::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counters = Arc::clone(&counters);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counters.record_fetched();
                        counters.record_failed();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = counters.snapshot();
        assert_eq!(stats.fetched_ok, 8000);
        assert_eq!(stats.failed, 8000);
    }

    #[test]
    fn test_display() {
        let stats = CrawlStatistics {
            discovered: 3,
            fetched_ok: 1,
            failed: 0,
            garbage: 2,
        };
        assert_eq!(
            stats.to_string(),
            "discovered:      3 | ok:      1 | failed:      0 | garbage:      2"
        );
    }
}
