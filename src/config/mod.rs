//! Configuration module for Kavosh
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use kavosh::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("kavosh.toml")).unwrap();
//! println!("Crawling {} with {} workers", config.site.domain, config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SiteConfig, UrlKeyMode, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
