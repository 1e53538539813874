use url::Url;

use crate::PROXY_PREFIX;

/// Proxy-route form of an absolute upstream URL.
///
/// This is the single place a URL is percent-encoded on its way back to
/// the client, mirroring the single decode in the target resolver.
pub fn proxied(absolute: &str) -> String {
    format!("{}/{}", PROXY_PREFIX, urlencoding::encode(absolute))
}

/// Context for rewriting one fetched manifest.
#[derive(Debug, Clone)]
pub struct RewriteContext {
    /// URL the manifest was fetched from.
    pub manifest_url: Url,

    /// Directory of `manifest_url`, always ending in a slash. Relative
    /// references resolve against this.
    base: Url,
}

impl RewriteContext {
    pub fn new(manifest_url: Url) -> Self {
        // Joining "." yields the URL's directory with a trailing slash.
        let base = manifest_url
            .join(".")
            .unwrap_or_else(|_| manifest_url.clone());
        Self { manifest_url, base }
    }

    /// Resolve a manifest reference to an absolute URL string.
    ///
    /// References that are already absolute come back exactly as written.
    /// Relative ones are joined against the manifest's directory; a
    /// reference the URL parser cannot join degrades to plain
    /// concatenation rather than failing the whole manifest.
    pub fn resolve(&self, reference: &str) -> String {
        let reference = reference.trim();
        if Url::parse(reference).is_ok() {
            return reference.to_string();
        }
        match self.base.join(reference) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.base, reference),
        }
    }

    /// Resolve a reference and route it back through the proxy in one step.
    pub fn proxy_reference(&self, reference: &str) -> String {
        proxied(&self.resolve(reference))
    }
}
