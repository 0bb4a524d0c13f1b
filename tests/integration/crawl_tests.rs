//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the fetch, cache, extract and discover cycle end-to-end.
//!
//! Followed links must be `https://`, which a plain wiremock server cannot
//! serve. Pages are therefore fetched through their http seed and the
//! discovered https links are checked in the frontier.

use kavosh::config::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use kavosh::crawler::Coordinator;
use kavosh::storage::{page_filename, rebuild_sidecars, sidecar_filename, storage_stats};
use kavosh::{Document, PageOutcome};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOMAIN: &str = "barbadpiano.com";

const HOME_PAGE: &str = r#"<html>
<head><title>پيانو كلاسيك</title><style>body { color: red; }</style></head>
<body>
    <h1>فروشگاه   پیانو</h1>
    <h2>می‌خواهم</h2>
    <p>متن صفحه</p>
    <a href="https://barbadpiano.com/a">A</a>
    <a href="https://barbadpiano.com/b#details">B</a>
    <a href="https://barbadpiano.com/c">C</a>
    <a href="https://barbadpiano.com/a#again">A again</a>
    <a href="https://elsewhere.com/d">Off domain</a>
    <a href="/relative">Relative</a>
</body>
</html>"#;

/// Creates a test configuration crawling `seed` into `storage_dir`
fn create_test_config(seed: &str, storage_dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            domain: DOMAIN.to_string(),
            seed: seed.to_string(),
        },
        crawler: CrawlerConfig {
            workers: 4,
            fetch_timeout_ms: 1000,
            fetch_budget_ms: 0,
            max_startup_jitter_ms: 0,
            progress_interval_ms: 100,
            ..Default::default()
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: Some("https://example.com/contact".to_string()),
        },
        output: OutputConfig {
            storage_dir: storage_dir.to_string_lossy().into_owned(),
        },
    }
}

async fn mount_html(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body, "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

async fn drain_frontier(coordinator: &Coordinator) -> Vec<String> {
    let mut urls = Vec::new();
    while !coordinator.frontier().is_empty() {
        if let Some(lease) = coordinator.frontier().next().await {
            urls.push(lease.url().to_string());
        }
    }
    urls.sort();
    urls
}

#[tokio::test]
async fn test_fetch_stores_page_sidecar_and_discovers_links() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/", HOME_PAGE).await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());
    let coordinator = Coordinator::new(create_test_config(&seed, temp_dir.path()))
        .await
        .expect("Failed to create coordinator");

    let outcome = coordinator.process_url(&seed).await;
    assert_eq!(outcome, PageOutcome::Fetched);

    let stats = coordinator.counters().snapshot();
    assert_eq!(stats.fetched_ok, 1);
    assert_eq!(stats.discovered, 3);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.garbage, 0);
    assert_eq!(coordinator.frontier().len(), 3);

    // Raw bytes are stored verbatim under the hashed name
    let page = page_filename(&seed);
    let stored = std::fs::read(temp_dir.path().join(&page)).expect("page missing");
    assert_eq!(stored, HOME_PAGE.as_bytes());

    // Sidecar holds the normalized document
    let json = std::fs::read(temp_dir.path().join(sidecar_filename(&page))).expect("sidecar missing");
    let document = Document::from_json(&json).expect("sidecar is not a document");
    assert_eq!(document.url, seed);
    assert_eq!(document.title, "پیانو کلاسیک");
    assert_eq!(document.h1, "فروشگاه پیانو");
    assert_eq!(document.h2, "می خواهم");
    assert_eq!(document.h3, "");
    assert!(document.body.contains("متن صفحه"));
    assert!(!document.body.contains("color: red"));

    assert_eq!(
        drain_frontier(&coordinator).await,
        vec![
            "https://barbadpiano.com/a",
            "https://barbadpiano.com/b",
            "https://barbadpiano.com/c",
        ]
    );
}

#[tokio::test]
async fn test_second_run_reuses_cache_without_network() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(HOME_PAGE, "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let seed = format!("{}/", mock_server.uri());

    let first = Coordinator::new(create_test_config(&seed, temp_dir.path()))
        .await
        .unwrap();
    assert_eq!(first.process_url(&seed).await, PageOutcome::Fetched);

    let sidecar = temp_dir.path().join(sidecar_filename(&page_filename(&seed)));
    let sidecar_before = std::fs::read(&sidecar).unwrap();

    // Fresh coordinator, same storage directory
    let second = Coordinator::new(create_test_config(&seed, temp_dir.path()))
        .await
        .unwrap();
    assert_eq!(second.process_url(&seed).await, PageOutcome::CacheHit);

    let stats = second.counters().snapshot();
    assert_eq!(stats.fetched_ok, 1);
    assert_eq!(stats.discovered, 3);
    assert_eq!(second.frontier().len(), 3);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    // The sidecar is not regenerated on a cache hit
    assert_eq!(std::fs::read(&sidecar).unwrap(), sidecar_before);
}

#[tokio::test]
async fn test_non_html_response_is_garbage() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    b"%PDF-1.4 https://barbadpiano.com/x".to_vec(),
                    "application/pdf",
                ),
        )
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let url = format!("{}/manual.pdf", mock_server.uri());
    let coordinator = Coordinator::new(create_test_config(&url, temp_dir.path()))
        .await
        .unwrap();

    assert_eq!(coordinator.process_url(&url).await, PageOutcome::NotHtml);

    let stats = coordinator.counters().snapshot();
    assert_eq!(stats.garbage, 1);
    assert_eq!(stats.fetched_ok, 0);
    assert_eq!(stats.discovered, 0);
    assert!(coordinator.frontier().is_empty());
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_content_type_is_garbage() {
    let mock_server = MockServer::start().await;
    // Raw bytes with no Content-Type header at all
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(HOME_PAGE.as_bytes()))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let seed = format!("{}/", mock_server.uri());
    let coordinator = Coordinator::new(create_test_config(&seed, temp_dir.path()))
        .await
        .unwrap();

    assert_eq!(coordinator.process_url(&seed).await, PageOutcome::NotHtml);
    assert_eq!(coordinator.counters().snapshot().garbage, 1);
    assert!(coordinator.frontier().is_empty());
}

#[tokio::test]
async fn test_plain_text_response_is_garbage() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HOME_PAGE))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let url = format!("{}/robots.txt", mock_server.uri());
    let coordinator = Coordinator::new(create_test_config(&url, temp_dir.path()))
        .await
        .unwrap();

    // HTML-looking body served as text/plain is still not HTML
    assert_eq!(coordinator.process_url(&url).await, PageOutcome::NotHtml);
    assert_eq!(coordinator.counters().snapshot().garbage, 1);
    assert_eq!(coordinator.counters().snapshot().discovered, 0);
}

#[tokio::test]
async fn test_full_run_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Discovered links point at the mock port over https; the TLS handshake
    // against a plain HTTP server fails, so they end up as garbage.
    let home = format!(
        r#"<html><body>
            <a href="{https}/barbadpiano.com/one">1</a>
            <a href="{https}/barbadpiano.com/two">2</a>
            <a href="{https}/barbadpiano.com/one#dup">1 again</a>
        </body></html>"#,
        https = base_url.replacen("http://", "https://", 1)
    );
    mount_html(&mock_server, "/", &home).await;

    let temp_dir = TempDir::new().unwrap();
    let seed = format!("{}/", base_url);
    let coordinator = Arc::new(
        Coordinator::new(create_test_config(&seed, temp_dir.path()))
            .await
            .unwrap(),
    );

    let stats = tokio::time::timeout(
        std::time::Duration::from_secs(30),
        Arc::clone(&coordinator).run(),
    )
    .await
    .expect("crawl did not terminate");

    assert_eq!(stats.fetched_ok, 1);
    assert_eq!(stats.discovered, 2);
    assert_eq!(stats.garbage, 2);
    assert_eq!(stats.failed, 0);
    assert!(coordinator.frontier().is_done());
    assert_eq!(coordinator.frontier().in_flight(), 0);
}

#[tokio::test]
async fn test_rebuild_restores_lost_sidecar() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/", HOME_PAGE).await;

    let temp_dir = TempDir::new().unwrap();
    let seed = format!("{}/", mock_server.uri());
    let coordinator = Coordinator::new(create_test_config(&seed, temp_dir.path()))
        .await
        .unwrap();
    coordinator.process_url(&seed).await;

    let page = page_filename(&seed);
    let sidecar = temp_dir.path().join(sidecar_filename(&page));
    std::fs::remove_file(&sidecar).unwrap();

    let stats = storage_stats(temp_dir.path()).unwrap();
    assert_eq!(stats.pages, 1);
    assert_eq!(stats.missing_sidecars, 1);

    let report = rebuild_sidecars(temp_dir.path()).unwrap();
    assert_eq!(report.processed, 1);

    let document = Document::from_json(&std::fs::read(&sidecar).unwrap()).unwrap();
    assert_eq!(document.title, "پیانو کلاسیک");
    // The URL cannot be recovered from the hash
    assert_eq!(document.url, page);

    assert_eq!(storage_stats(temp_dir.path()).unwrap().missing_sidecars, 0);
}
