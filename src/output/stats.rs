//! Statistics printing
//!
//! Summaries go to stdout with `println!`; progress during a crawl goes
//! through `tracing` instead.

use crate::state::CrawlStatistics;
use crate::storage::{RebuildReport, StorageStats};
use std::time::Duration;

/// Share of processed URLs that ended as fetched pages, in percent
///
/// Processed means fetched or garbage. Returns 0 before anything
/// has been processed.
pub fn success_rate(stats: &CrawlStatistics) -> f64 {
    let processed = stats.fetched_ok + stats.garbage;
    if processed == 0 {
        0.0
    } else {
        (stats.fetched_ok as f64 / processed as f64) * 100.0
    }
}

/// Prints the final crawl statistics
///
/// # Arguments
///
/// * `stats` - Counters at the end of the run
/// * `elapsed` - Wall time of the run
pub fn print_statistics(stats: &CrawlStatistics, elapsed: Duration) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Links discovered: {}", stats.discovered);
    println!("  Pages fetched (incl. cache hits): {}", stats.fetched_ok);
    println!("  Failed (storage/sidecar): {}", stats.failed);
    println!("  Garbage (network/non-HTML): {}", stats.garbage);
    println!();

    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        stats.fetched_ok as f64 / secs
    } else {
        0.0
    };
    println!("Elapsed: {:.1}s ({:.2} pages/sec)", secs, rate);
    println!(
        "Success Rate: {:.1}% ({} / {} URLs fetched as HTML)",
        success_rate(stats),
        stats.fetched_ok,
        stats.fetched_ok + stats.garbage
    );
}

/// Prints file counts of a storage directory
pub fn print_storage_stats(dir: &std::path::Path, stats: &StorageStats) {
    println!("=== Storage Statistics ===\n");
    println!("Directory: {}", dir.display());
    println!("  Cached pages: {}", stats.pages);
    println!("  Sidecars: {}", stats.sidecars);

    if stats.missing_sidecars > 0 {
        println!(
            "  Pages without sidecar: {} (run with --rebuild to regenerate)",
            stats.missing_sidecars
        );
    } else {
        println!("  Pages without sidecar: 0");
    }
}

/// Prints the outcome of a sidecar rebuild
pub fn print_rebuild_report(report: &RebuildReport) {
    println!("=== Sidecar Rebuild ===\n");
    println!("  Sidecars written: {}", report.processed);
    println!("  Errors: {}", report.errors);
    println!("  Elapsed: {:.1}s", report.elapsed.as_secs_f64());
}
