use std::fmt;

/// Result of processing a single frontier entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    // ===== Success =====
    /// Page was downloaded, stored, and its links followed
    Fetched,

    /// Page was already in the cache; only its links were followed
    CacheHit,

    // ===== Garbage =====
    /// GET failed: timeout, connection error, or body read error
    NetworkError,

    /// Response Content-Type was not `text/html`
    NotHtml,

    // ===== Failure =====
    /// The cache file could not be written or read back
    StorageFailed,
}

impl PageOutcome {
    /// Returns true if the page counts toward the fetched-ok total
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched | Self::CacheHit)
    }

    /// Returns true if the response was thrown away as garbage
    pub fn is_garbage(&self) -> bool {
        matches!(self, Self::NetworkError | Self::NotHtml)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetched => "fetched",
            Self::CacheHit => "cache_hit",
            Self::NetworkError => "network_error",
            Self::NotHtml => "not_html",
            Self::StorageFailed => "storage_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
