use url::Url;

use crate::{Error, Result};

/// Turn the raw proxy path segment into the upstream URL it names.
///
/// The segment arrives exactly as it appeared on the wire: percent-encoded
/// by well-behaved clients, but possibly a bare URL pasted into a browser
/// bar. Percent-decoding is applied exactly once; nested manifests re-enter
/// through the same route and are decoded on their own request.
///
/// Only absolute http and https URLs are accepted. Anything else fails
/// before any upstream request is attempted.
pub fn resolve_target(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidTarget(String::new()));
    }

    if let Ok(decoded) = urlencoding::decode(trimmed) {
        if let Some(url) = parse_http_url(&decoded) {
            return Ok(url);
        }
    }

    // A decode pass can mangle targets that were never encoded (a literal
    // '%' in the path, say), so give the raw form a chance too.
    parse_http_url(trimmed).ok_or_else(|| Error::InvalidTarget(trimmed.to_string()))
}

fn parse_http_url(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate).ok()?;
    if matches!(url.scheme(), "http" | "https") {
        Some(url)
    } else {
        None
    }
}
