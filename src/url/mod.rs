//! URL handling module for Kavosh
//!
//! Discovered hrefs are compared as plain strings. This module decides which
//! hrefs are followed at all and which string becomes their dedup key.

mod normalize;

use crate::config::UrlKeyMode;

pub use normalize::canonical_url;

/// Only absolute links with this prefix are followed
pub const FOLLOWED_SCHEME_PREFIX: &str = "https://";

/// Removes everything from the first `#` onward
///
/// # Examples
///
/// ```
/// use kavosh::url::strip_fragment;
///
/// assert_eq!(strip_fragment("https://example.com/a#top"), "https://example.com/a");
/// assert_eq!(strip_fragment("#only"), "");
/// ```
pub fn strip_fragment(href: &str) -> &str {
    match href.find('#') {
        Some(idx) => &href[..idx],
        None => href,
    }
}

/// Returns the followable form of an href, or `None` if it is not followed
///
/// The href is trimmed and its fragment removed. What remains must be an
/// absolute `https://` URL containing `domain` somewhere in its host or path.
/// Relative links, other schemes and off-domain links are all rejected.
pub fn target_link<'a>(href: &'a str, domain: &str) -> Option<&'a str> {
    let link = strip_fragment(href.trim());

    if link.starts_with(FOLLOWED_SCHEME_PREFIX) && link.contains(domain) {
        Some(link)
    } else {
        None
    }
}

/// Turns a followable link into the string used for dedup, fetching and hashing
///
/// Returns `None` when canonical mode cannot parse the link.
pub fn link_key(link: &str, mode: UrlKeyMode) -> Option<String> {
    match mode {
        UrlKeyMode::Verbatim => Some(link.to_string()),
        UrlKeyMode::Canonical => match canonical_url(link) {
            Ok(key) => Some(key),
            Err(e) => {
                tracing::debug!("Skipping link {}: {}", link, e);
                None
            }
        },
    }
}
