use crate::extract::{extract_document, Document};
use crate::storage::{StorageError, StorageResult, PAGE_EXTENSION, SIDECAR_EXTENSION};
use std::path::Path;
use std::time::{Duration, Instant};

/// Outcome of an offline sidecar rebuild
#[derive(Debug, Clone, Default)]
pub struct RebuildReport {
    /// Sidecars rewritten
    pub processed: u64,

    /// Pages that could not be read, extracted or written
    pub errors: u64,

    /// Wall time of the whole pass
    pub elapsed: Duration,
}

/// Regenerates every `.json` sidecar from the cached `.html` pages
///
/// Runs without network access and without touching any crawl state. The
/// page URL is taken from the existing sidecar when it has one; otherwise
/// the page file name stands in for it, since the hash cannot be reversed.
///
/// A directory that cannot be listed is an error; a single bad page is
/// logged and counted in [`RebuildReport::errors`].
pub fn rebuild_sidecars(dir: &Path) -> StorageResult<RebuildReport> {
    tracing::info!("Rebuilding sidecars in {}", dir.display());
    let start = Instant::now();

    let mut pages = Vec::new();
    let entries = std::fs::read_dir(dir).map_err(|source| StorageError::io(dir, source))?;
    for entry in entries {
        let path = entry.map_err(|source| StorageError::io(dir, source))?.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(PAGE_EXTENSION) {
            pages.push(path);
        }
    }
    pages.sort();

    let mut report = RebuildReport::default();
    for page_path in &pages {
        match rebuild_one(page_path) {
            Ok(()) => {
                report.processed += 1;
                if report.processed % 100 == 0 {
                    tracing::info!("Rebuilt {} sidecars...", report.processed);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to rebuild sidecar for {}: {}", page_path.display(), e);
                report.errors += 1;
            }
        }
    }

    report.elapsed = start.elapsed();
    tracing::info!(
        "Rebuilt {} sidecars in {:?} (errors: {})",
        report.processed,
        report.elapsed,
        report.errors
    );

    Ok(report)
}

fn rebuild_one(page_path: &Path) -> StorageResult<()> {
    let sidecar_path = page_path.with_extension(SIDECAR_EXTENSION);
    let url = recorded_url(&sidecar_path).unwrap_or_else(|| {
        page_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let html = std::fs::read(page_path).map_err(|source| StorageError::io(page_path, source))?;
    let document = extract_document(&html, &url);
    let json = document.to_json()?;

    std::fs::write(&sidecar_path, json).map_err(|source| StorageError::io(&sidecar_path, source))
}

/// URL stored in an existing, readable sidecar
fn recorded_url(sidecar_path: &Path) -> Option<String> {
    let bytes = std::fs::read(sidecar_path).ok()?;
    let document = Document::from_json(&bytes).ok()?;
    Some(document.url).filter(|url| !url.is_empty())
}
