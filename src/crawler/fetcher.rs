//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent
//! - GET requests with a per-request deadline
//! - Content-Type gating (only HTML is kept)
//! - Error classification for logging

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;

/// Content-Type substring that marks a response as HTML
pub const HTML_CONTENT_TYPE: &str = "text/html";

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Raw response body, exactly as received
        body: Vec<u8>,
    },

    /// Response is not HTML (Content-Type mismatch or missing)
    ContentMismatch {
        /// The actual Content-Type received, empty if absent
        content_type: String,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Requests time out after `fetch-timeout-ms`. Connections are not reused
/// between requests: every fetch sends `Connection: close` and the idle
/// pool is disabled. Redirects follow reqwest's default policy.
///
/// # Example
///
/// ```no_run
/// use kavosh::config::{CrawlerConfig, UserAgentConfig};
/// use kavosh::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    crawler: &CrawlerConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("close"));

    Client::builder()
        .user_agent(user_agent.header_value())
        .default_headers(headers)
        .timeout(Duration::from_millis(crawler.fetch_timeout_ms))
        .pool_max_idle_per_host(0)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and keeps the body only if it is HTML
///
/// The status code is not inspected: an error page served as `text/html`
/// is a successful fetch.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            return FetchResult::NetworkError {
                error: classify_error(&e),
            }
        }
    };

    let status_code = response.status().as_u16();
    let final_url = response.url().to_string();

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if !is_html(&content_type) {
        return FetchResult::ContentMismatch { content_type };
    }

    match response.bytes().await {
        Ok(body) => FetchResult::Success {
            final_url,
            status_code,
            content_type,
            body: body.to_vec(),
        },
        Err(e) => FetchResult::NetworkError {
            error: classify_error(&e),
        },
    }
}

/// Whether a Content-Type header value denotes HTML
pub fn is_html(content_type: &str) -> bool {
    content_type.contains(HTML_CONTENT_TYPE)
}

fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
