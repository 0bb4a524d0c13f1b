use crate::{UrlError, UrlResult};
use url::Url;

/// Query parameters that never change page content
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid", "ref", "source"];

/// Builds the canonical dedup key for an https link
///
/// Only used when `url-keys = "canonical"`; the default mode keys on the
/// fragment-stripped href as-is.
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject anything that is not `https`
/// 2. Lowercase the host and drop a leading `www.`
/// 3. Remove dot segments, empty segments and the trailing slash (root stays `/`)
/// 4. Drop the fragment
/// 5. Drop tracking query parameters, sort the rest, drop an empty `?`
///
/// # Examples
///
/// ```
/// use kavosh::url::canonical_url;
///
/// let key = canonical_url("https://WWW.Example.com/a/./b/?utm_source=x&z=1&a=2#top").unwrap();
/// assert_eq!(key, "https://example.com/a/b?a=2&z=1");
/// ```
pub fn canonical_url(href: &str) -> UrlResult<String> {
    let mut url = Url::parse(href).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url
        .host_str()
        .ok_or(UrlError::MissingDomain)?
        .to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    let path = canonical_path(url.path());
    url.set_path(&path);

    url.set_fragment(None);

    if url.query().is_some() {
        let params = kept_query_params(&url);
        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    Ok(url.into())
}

/// Collapses dot and empty segments and strips the trailing slash
fn canonical_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

/// Query pairs without tracking parameters, sorted by key then value
fn kept_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    params.sort();
    params
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}
