use serde::Deserialize;

/// Main configuration structure for Kavosh
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// The single site being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Domain that every followed link must contain (e.g., "barbadpiano.com")
    pub domain: String,

    /// URL pushed onto the frontier before the workers start
    pub seed: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Number of parallel workers
    pub workers: u32,

    /// Hard capacity of the frontier queue (also sizes the dedup set)
    pub frontier_capacity: usize,

    /// Timeout for a single GET (milliseconds)
    pub fetch_timeout_ms: u64,

    /// Minimum wall time a worker spends per network fetch (milliseconds)
    pub fetch_budget_ms: u64,

    /// Upper bound of the random delay before a worker starts (milliseconds)
    pub max_startup_jitter_ms: u64,

    /// Interval between progress snapshots (milliseconds)
    pub progress_interval_ms: u64,

    /// How discovered hrefs are turned into dedup keys
    pub url_keys: UrlKeyMode,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            workers: 20,
            frontier_capacity: 11_000,
            fetch_timeout_ms: 5_000,
            fetch_budget_ms: 5_000,
            max_startup_jitter_ms: 3_000,
            progress_interval_ms: 3_000,
            url_keys: UrlKeyMode::Verbatim,
        }
    }
}

/// Dedup key strategy for discovered links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrlKeyMode {
    /// The href with its fragment removed, byte for byte
    #[default]
    Verbatim,

    /// A canonical form: lowercase host, no `www.`, tidy path, sorted query
    Canonical,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "Kavosh".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Name/Version` or `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding the `<hash>.html` / `<hash>.json` pairs
    #[serde(rename = "storage-dir")]
    pub storage_dir: String,
}
