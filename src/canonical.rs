//! Canonical URLs used as credential cache keys
//!
//! A canonical URL is the request URL without its query string and fragment.
//! Canonicalization is best-effort: anything `url::Url` cannot parse is returned
//! unchanged, so the result can always be used as an exact-match key.

use url::Url;

/// Remove the query and fragment parts from a URL.
///
/// # Examples
/// ```
/// use quicpulse_auth::canonical::canonical_url;
/// assert_eq!(canonical_url("http://h/a?x=1#f"), "http://h/a");
/// assert_eq!(canonical_url("not a url"), "not a url");
/// ```
pub fn canonical_url(url: &str) -> String {
    if url.is_empty() {
        return String::new();
    }
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_query(None);
            parsed.set_fragment(None);
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}
