//! Output module for crawl progress and summaries
//!
//! This module handles:
//! - Periodic progress lines while a crawl runs
//! - Printing final crawl and storage statistics

mod progress;
pub mod stats;

pub use progress::ProgressReporter;
pub use stats::{print_rebuild_report, print_statistics, print_storage_stats, success_rate};
