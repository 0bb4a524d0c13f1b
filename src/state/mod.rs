//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlCounters`: the four shared totals (discovered, fetched-ok, failed, garbage)
//! - `CrawlStatistics`: a copied snapshot of those totals
//! - `PageOutcome`: what happened to one dequeued URL

mod counters;
mod outcome;

// Re-export main types
pub use counters::{CrawlCounters, CrawlStatistics};
pub use outcome::PageOutcome;
