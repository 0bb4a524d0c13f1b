//! Storage module for crawled pages
//!
//! This module handles everything that touches the storage directory:
//! - Content-addressed `<hash>.html` pages and their `<hash>.json` sidecars
//! - Offline regeneration of sidecars from cached pages
//! - Directory statistics

mod cache;
mod rebuild;

pub use cache::{
    page_filename, sidecar_filename, ContentCache, PAGE_EXTENSION, SIDECAR_EXTENSION,
};
pub use rebuild::{rebuild_sidecars, RebuildReport};

use crate::extract::ExtractError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Sidecar error: {0}")]
    Sidecar(#[from] ExtractError),
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// File counts of a storage directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Cached `.html` pages
    pub pages: u64,

    /// `.json` sidecars
    pub sidecars: u64,

    /// Pages with no sidecar next to them
    ///
    /// A crawl that stopped between writing a page and its sidecar leaves
    /// these behind; later runs treat the page as cached and never write
    /// the sidecar. `rebuild_sidecars` repairs them.
    pub missing_sidecars: u64,
}

/// Counts pages and sidecars in a storage directory
pub fn storage_stats(dir: &Path) -> StorageResult<StorageStats> {
    let mut stats = StorageStats::default();

    let entries = std::fs::read_dir(dir).map_err(|source| StorageError::io(dir, source))?;
    for entry in entries {
        let entry = entry.map_err(|source| StorageError::io(dir, source))?;
        let path = entry.path();

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(PAGE_EXTENSION) => {
                stats.pages += 1;
                if !path.with_extension(SIDECAR_EXTENSION).exists() {
                    stats.missing_sidecars += 1;
                }
            }
            Some(SIDECAR_EXTENSION) => stats.sidecars += 1,
            _ => {}
        }
    }

    Ok(stats)
}
