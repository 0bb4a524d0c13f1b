//! Kavosh main entry point
//!
//! This is the command-line interface for the Kavosh site crawler.

use clap::Parser;
use kavosh::config::{load_config_with_hash, Config};
use kavosh::crawler::run_crawl;
use kavosh::output::{print_rebuild_report, print_statistics, print_storage_stats};
use kavosh::storage::{rebuild_sidecars, storage_stats};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Kavosh: a single-site crawler for Persian-language content
///
/// Kavosh crawls every HTML page of one domain, caches the raw bytes under
/// content-addressed file names, and writes a normalized JSON document next
/// to each page for downstream search indexing.
#[derive(Parser, Debug)]
#[command(name = "kavosh")]
#[command(version)]
#[command(about = "A single-site Persian crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["stats", "rebuild"])]
    dry_run: bool,

    /// Show statistics of the storage directory and exit
    #[arg(long, conflicts_with_all = ["dry_run", "rebuild"])]
    stats: bool,

    /// Regenerate every JSON sidecar from the cached pages and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    rebuild: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.rebuild {
        handle_rebuild(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` is not consulted; verbosity flags alone pick the filter.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("kavosh=info,warn"),
            1 => EnvFilter::new("kavosh=debug,info"),
            2 => EnvFilter::new("kavosh=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the validated configuration
fn handle_dry_run(config: &Config) {
    println!("=== Kavosh Dry Run ===\n");

    println!("Site:");
    println!("  Domain: {}", config.site.domain);
    println!("  Seed: {}", config.site.seed);

    println!("\nCrawler Configuration:");
    println!("  Workers: {}", config.crawler.workers);
    println!("  Frontier capacity: {}", config.crawler.frontier_capacity);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    println!("  Fetch budget: {}ms", config.crawler.fetch_budget_ms);
    println!(
        "  Max startup jitter: {}ms",
        config.crawler.max_startup_jitter_ms
    );
    println!(
        "  Progress interval: {}ms",
        config.crawler.progress_interval_ms
    );
    println!("  URL keys: {:?}", config.crawler.url_keys);

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Storage directory: {}", config.output.storage_dir);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: counts pages and sidecars on disk
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let dir = Path::new(&config.output.storage_dir);
    let stats = storage_stats(dir)?;
    print_storage_stats(dir, &stats);
    Ok(())
}

/// Handles the --rebuild mode: regenerates sidecars offline
fn handle_rebuild(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let report = rebuild_sidecars(Path::new(&config.output.storage_dir))?;
    print_rebuild_report(&report);
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Crawling {} from {} into {}",
        config.site.domain,
        config.site.seed,
        config.output.storage_dir
    );

    let start = Instant::now();
    match run_crawl(config).await {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&stats, start.elapsed());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
