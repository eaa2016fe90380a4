//! Request path resolution against a configured endpoint.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Paths that already carry a scheme and are not relative to any endpoint.
    static ref SCHEME_PREFIX: Regex = Regex::new(r"(?i)^https?://").unwrap();
}

/// Join a configured endpoint with a request path.
///
/// An already-absolute `path` (scheme-prefixed) is returned unchanged and the
/// endpoint is ignored. Otherwise leading slashes are stripped from `path`
/// and it is appended to `endpoint` with a single `/`. The endpoint is not
/// validated; an empty endpoint yields a root-relative path.
pub fn resolve(endpoint: &str, path: &str) -> String {
    if SCHEME_PREFIX.is_match(path) {
        path.to_string()
    } else {
        format!("{}/{}", endpoint, path.trim_start_matches('/'))
    }
}
