use crate::extract::Document;
use crate::storage::StorageError;
use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Extension of cached raw pages
pub const PAGE_EXTENSION: &str = "html";

/// Extension of document sidecars
pub const SIDECAR_EXTENSION: &str = "json";

/// Content-addressed cache file name for a URL
///
/// `base32(sha256(url))` without padding, plus `.html`. The same URL string
/// always yields the same name across runs and machines.
///
/// # Example
///
/// ```
/// use kavosh::storage::page_filename;
///
/// let name = page_filename("https://barbadpiano.com/");
/// assert_eq!(name, page_filename("https://barbadpiano.com/"));
/// assert_eq!(name.len(), 52 + ".html".len());
/// ```
pub fn page_filename(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{}.{}", BASE32_NOPAD.encode(&digest), PAGE_EXTENSION)
}

/// Sidecar file name belonging to a page file name
pub fn sidecar_filename(page_filename: &str) -> String {
    let stem = page_filename
        .strip_suffix(PAGE_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(page_filename);
    format!("{}.{}", stem, SIDECAR_EXTENSION)
}

/// On-disk page cache keyed by URL hash
///
/// A page is "already fetched" exactly when its `.html` file exists. Entries
/// are never refreshed or invalidated.
#[derive(Debug, Clone)]
pub struct ContentCache {
    dir: PathBuf,
}

impl ContentCache {
    /// Wraps an existing storage directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the storage directory if needed and wraps it
    ///
    /// Failure here is the only storage error that stops a crawl.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::io(&dir, source))?;
        Ok(Self { dir })
    }

    /// The storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the cached page for `url`
    pub fn page_path(&self, url: &str) -> PathBuf {
        self.dir.join(page_filename(url))
    }

    /// Full path of the sidecar for `url`
    pub fn sidecar_path(&self, url: &str) -> PathBuf {
        self.page_path(url).with_extension(SIDECAR_EXTENSION)
    }

    /// Whether the page for `url` has been fetched before
    pub async fn exists(&self, url: &str) -> bool {
        tokio::fs::try_exists(self.page_path(url))
            .await
            .unwrap_or(false)
    }

    /// Persists raw response bytes verbatim and returns the page path
    ///
    /// Bytes go to a `.part` file first and are renamed into place, so a
    /// crash never leaves a truncated page that later reads as cached.
    pub async fn store_page(&self, url: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        let path = self.page_path(url);
        let partial = path.with_extension("html.part");

        tokio::fs::write(&partial, bytes)
            .await
            .map_err(|source| StorageError::io(&partial, source))?;
        tokio::fs::rename(&partial, &path)
            .await
            .map_err(|source| StorageError::io(&path, source))?;

        Ok(path)
    }

    /// Writes the sidecar next to an already stored page
    pub async fn store_document(
        &self,
        page_path: &Path,
        document: &Document,
    ) -> Result<PathBuf, StorageError> {
        let path = page_path.with_extension(SIDECAR_EXTENSION);
        let json = document.to_json()?;

        tokio::fs::write(&path, json)
            .await
            .map_err(|source| StorageError::io(&path, source))?;

        Ok(path)
    }

    /// Reads a cached page back
    pub async fn read_page(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.page_path(url);
        tokio::fs::read(&path)
            .await
            .map_err(|source| StorageError::io(&path, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filename_is_deterministic() {
        let urls = [
            "https://barbadpiano.com/",
            "https://barbadpiano.com/product/گیتار",
            "",
        ];
        for url in urls {
            assert_eq!(page_filename(url), page_filename(url));
        }
    }

    #[test]
    fn test_filename_shape() {
        let name = page_filename("https://barbadpiano.com/");
        let stem = name.strip_suffix(".html").unwrap();

        // 32 byte digest -> 52 base32 characters, no '=' padding
        assert_eq!(stem.len(), 52);
        assert!(stem
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c)));
    }

    #[test]
    fn test_known_digest() {
        // sha256("") = e3b0c442...b855
        assert_eq!(
            page_filename(""),
            "4OYMIQUY7QOBJGX36TEJS35ZEQT24QPEMSNZGTFESWMRW6CSXBKQ.html"
        );
    }

    #[test]
    fn test_distinct_urls_distinct_names() {
        assert_ne!(
            page_filename("https://barbadpiano.com/a"),
            page_filename("https://barbadpiano.com/a/")
        );
    }

    #[test]
    fn test_sidecar_filename() {
        assert_eq!(sidecar_filename("ABC.html"), "ABC.json");
        let page = page_filename("https://barbadpiano.com/");
        let cache = ContentCache::new("/tmp/site");
        assert_eq!(
            cache.sidecar_path("https://barbadpiano.com/"),
            Path::new("/tmp/site").join(sidecar_filename(&page))
        );
    }

    #[tokio::test]
    async fn test_store_and_read_page() {
        let dir = TempDir::new().unwrap();
        let cache = ContentCache::create(dir.path().join("site")).await.unwrap();
        let url = "https://barbadpiano.com/";

        assert!(!cache.exists(url).await);

        let path = cache.store_page(url, b"<html>hi</html>").await.unwrap();
        assert_eq!(path, cache.page_path(url));
        assert!(cache.exists(url).await);
        assert_eq!(cache.read_page(url).await.unwrap(), b"<html>hi</html>");

        // No partial file left behind
        assert!(!path.with_extension("html.part").exists());
    }

    #[tokio::test]
    async fn test_store_document_next_to_page() {
        let dir = TempDir::new().unwrap();
        let cache = ContentCache::create(dir.path()).await.unwrap();
        let url = "https://barbadpiano.com/";

        let page_path = cache.store_page(url, b"<html></html>").await.unwrap();
        let document = Document {
            url: url.to_string(),
            title: "خانه".to_string(),
            ..Default::default()
        };
        let sidecar = cache.store_document(&page_path, &document).await.unwrap();

        assert_eq!(sidecar, cache.sidecar_path(url));
        let stored = Document::from_json(&std::fs::read(&sidecar).unwrap()).unwrap();
        assert_eq!(stored, document);
    }

    #[tokio::test]
    async fn test_read_missing_page_is_error() {
        let dir = TempDir::new().unwrap();
        let cache = ContentCache::new(dir.path());
        let err = cache.read_page("https://barbadpiano.com/none").await;
        assert!(matches!(err, Err(StorageError::Io { .. })));
    }
}
