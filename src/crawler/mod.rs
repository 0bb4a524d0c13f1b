//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The dedup set and bounded frontier shared by all workers
//! - HTTP fetching
//! - Link discovery
//! - Overall crawl coordination

mod coordinator;
mod dedup;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{pacing_delay, run_crawl, Coordinator};
pub use dedup::DedupSet;
pub use fetcher::{build_http_client, fetch_url, is_html, FetchResult, HTML_CONTENT_TYPE};
pub use frontier::{Frontier, FrontierLease};
pub use parser::{discover_links, discover_links_in};
