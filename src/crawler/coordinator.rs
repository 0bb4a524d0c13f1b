//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the worker pool that coordinates all aspects of the
//! crawling process, including:
//! - Seeding the frontier
//! - Cache lookups and fetching
//! - Persisting pages and their extracted sidecars
//! - Link discovery and deduplication
//! - Per-worker pacing and startup jitter

use crate::config::Config;
use crate::crawler::dedup::DedupSet;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::{discover_links, discover_links_in};
use crate::crawler::{build_http_client, fetch_url, FetchResult};
use crate::extract::{document_from_html, parse_page, Document};
use crate::output::ProgressReporter;
use crate::state::{CrawlCounters, CrawlStatistics, PageOutcome};
use crate::storage::ContentCache;
use crate::url::{link_key, strip_fragment};
use crate::KavoshError;
use rand::Rng;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

/// Main crawler coordinator structure
///
/// Everything here is shared by all workers of one run: one frontier, one
/// dedup set, one set of counters and one HTTP client.
pub struct Coordinator {
    config: Arc<Config>,
    cache: ContentCache,
    frontier: Frontier,
    seen: DedupSet,
    counters: CrawlCounters,
    client: Client,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Creates the storage directory and builds the HTTP client. Either
    /// failing is fatal for the run.
    pub async fn new(config: Config) -> Result<Self, KavoshError> {
        let cache = ContentCache::create(&config.output.storage_dir).await?;
        let client = build_http_client(&config.crawler, &config.user_agent)?;
        let capacity = config.crawler.frontier_capacity;

        Ok(Self {
            config: Arc::new(config),
            cache,
            frontier: Frontier::new(capacity),
            seen: DedupSet::with_capacity(capacity),
            counters: CrawlCounters::new(),
            client,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn counters(&self) -> &CrawlCounters {
        &self.counters
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Pushes the seed URL and marks it as seen
    ///
    /// The seed is not counted as discovered. Returns the seed's key.
    pub async fn seed(&self) -> String {
        let seed = strip_fragment(self.config.site.seed.trim());
        let key = link_key(seed, self.config.crawler.url_keys).unwrap_or_else(|| seed.to_string());

        self.seen.add(&key);
        self.frontier.push(key.clone()).await;
        tracing::info!("Seeded frontier with {}", key);

        key
    }

    /// Runs the worker pool until the frontier is exhausted
    ///
    /// Seeds the frontier, starts `workers` tasks plus the progress reporter,
    /// and waits for every worker to retire. Returns the final counters.
    pub async fn run(self: Arc<Self>) -> CrawlStatistics {
        let start_time = Instant::now();
        let workers = self.config.crawler.workers;

        tracing::info!(
            "Starting crawl of {} with {} workers",
            self.config.site.domain,
            workers
        );

        self.seed().await;

        let reporter = ProgressReporter::spawn(
            Arc::clone(&self),
            Duration::from_millis(self.config.crawler.progress_interval_ms),
        );

        let mut pool = JoinSet::new();
        for id in 0..workers {
            pool.spawn(Arc::clone(&self).worker(id));
        }

        while let Some(result) = pool.join_next().await {
            if let Err(e) = result {
                tracing::error!("Worker task failed: {}", e);
            }
        }

        reporter.stop();

        let stats = self.counters.snapshot();
        let elapsed = start_time.elapsed();
        let rate = stats.fetched_ok as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        tracing::info!("Crawl completed in {:?}: {}", elapsed, stats);
        tracing::info!("{:.2} pages/sec", rate);

        stats
    }

    async fn worker(self: Arc<Self>, id: u32) {
        let jitter = startup_jitter(self.config.crawler.max_startup_jitter_ms);
        tracing::debug!("Worker {} starting in {:?}", id, jitter);
        tokio::time::sleep(jitter).await;

        let mut processed = 0u64;
        while let Some(lease) = self.frontier.next().await {
            let outcome = self.process_url(lease.url()).await;
            tracing::debug!("Worker {} {} -> {}", id, lease.url(), outcome);
            processed += 1;
        }

        tracing::debug!("Worker {} retired after {} URLs", id, processed);
    }

    /// Processes a single URL
    ///
    /// A URL whose page is already cached is never fetched again; its links
    /// are re-derived from the cached bytes. Otherwise the page is fetched,
    /// stored with its sidecar, mined for links, and the worker is paced.
    pub async fn process_url(&self, url: &str) -> PageOutcome {
        if self.cache.exists(url).await {
            self.replay_cached(url).await
        } else {
            self.fetch_and_store(url).await
        }
    }

    async fn fetch_and_store(&self, url: &str) -> PageOutcome {
        let started = Instant::now();

        let body = match fetch_url(&self.client, url).await {
            FetchResult::Success {
                final_url,
                status_code,
                content_type,
                body,
            } => {
                tracing::debug!(
                    "Fetched {} ({} {}, {} bytes)",
                    url,
                    status_code,
                    content_type,
                    body.len()
                );
                if final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                body
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("Skipping {}: not HTML ({:?})", url, content_type);
                self.counters.record_garbage();
                return PageOutcome::NotHtml;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed to fetch {}: {}", url, error);
                self.counters.record_garbage();
                return PageOutcome::NetworkError;
            }
        };

        self.counters.record_fetched();

        let page_path = match self.cache.store_page(url, &body).await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Failed to store {}: {}", url, e);
                self.counters.record_failed();
                return PageOutcome::StorageFailed;
            }
        };

        let (document, links) = self.extract(url, &body);

        if let Err(e) = self.cache.store_document(&page_path, &document).await {
            tracing::warn!("Failed to write sidecar for {}: {}", url, e);
            self.counters.record_failed();
        }

        self.follow_links(links).await;

        let remaining = pacing_delay(
            Duration::from_millis(self.config.crawler.fetch_budget_ms),
            started.elapsed(),
        );
        if !remaining.is_zero() {
            tokio::time::sleep(remaining).await;
        }

        PageOutcome::Fetched
    }

    async fn replay_cached(&self, url: &str) -> PageOutcome {
        let body = match self.cache.read_page(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read cached page for {}: {}", url, e);
                self.counters.record_failed();
                return PageOutcome::StorageFailed;
            }
        };

        self.counters.record_fetched();

        let links = discover_links_in(&body, &self.config.site.domain);
        self.follow_links(links).await;

        PageOutcome::CacheHit
    }

    /// Builds the sidecar document and collects links from one parse
    fn extract(&self, url: &str, body: &[u8]) -> (Document, Vec<String>) {
        let page = parse_page(body);
        let document = document_from_html(&page, url);
        let links = discover_links(&page, &self.config.site.domain);
        (document, links)
    }

    /// Enqueues every link that wins the dedup race; returns how many did
    async fn follow_links(&self, links: Vec<String>) -> usize {
        let mut discovered = 0;

        for link in links {
            let Some(key) = link_key(&link, self.config.crawler.url_keys) else {
                continue;
            };

            if self.seen.add_if_not_exists(&key) {
                self.counters.record_discovered();
                self.frontier.push(key).await;
                discovered += 1;
            }
        }

        discovered
    }
}

/// Time left in the per-fetch budget, zero once it is used up
pub fn pacing_delay(budget: Duration, elapsed: Duration) -> Duration {
    budget.saturating_sub(elapsed)
}

fn startup_jitter(max_ms: u64) -> Duration {
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use kavosh::config::load_config;
/// use kavosh::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("kavosh.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{}", stats);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, KavoshError> {
    let coordinator = Arc::new(Coordinator::new(config).await?);
    Ok(coordinator.run().await)
}
