//! Outbound link discovery
//!
//! Only `<a href>` values are considered. An href is followed when, after
//! trimming and dropping its fragment, it is an absolute `https://` URL that
//! mentions the target domain. Relative links are never resolved.

use crate::extract::parse_page;
use crate::url::target_link;
use scraper::{Html, Selector};

/// Collects followable links from a parsed page, in document order
///
/// Duplicates are kept; the dedup set decides which ones are new.
///
/// # Example
///
/// ```
/// use kavosh::crawler::discover_links;
/// use scraper::Html;
///
/// let page = Html::parse_document(r#"<a href="https://example-domain.com/a/b#sec">x</a>"#);
/// assert_eq!(discover_links(&page, "example-domain.com"), vec!["https://example-domain.com/a/b"]);
/// ```
pub fn discover_links(page: &Html, domain: &str) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in page.select(&a_selector) {
            if let Some(link) = element
                .value()
                .attr("href")
                .and_then(|href| target_link(href, domain))
            {
                links.push(link.to_string());
            }
        }
    }

    links
}

/// Parses raw page bytes and collects followable links
pub fn discover_links_in(html: &[u8], domain: &str) -> Vec<String> {
    discover_links(&parse_page(html), domain)
}
