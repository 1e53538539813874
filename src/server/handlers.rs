use axum::{
    extract::State,
    http::{HeaderMap, Uri},
    response::Response,
};

use crate::{
    proxy::{self, headers::outbound_headers},
    rewrite::{self, RewriteContext},
    server::{respond, state::AppState},
    Result, PROXY_PREFIX,
};

/// Handle GET and HEAD requests under the proxy prefix.
///
/// The target is cut out of the raw request URI instead of a path
/// extractor, so its percent-encoding reaches the resolver exactly as the
/// client sent it.
pub async fn handle_proxy(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let target = proxy::resolve_target(raw_target(&uri))?;

    tracing::info!("Proxy request: {}", target);

    let outbound = outbound_headers(&headers, &target, &state.config.user_agents);
    let upstream = state.client.fetch(&target, outbound).await?;

    tracing::debug!(
        "Upstream {} for {} ({} bytes)",
        upstream.status,
        target,
        upstream.body.len()
    );

    if rewrite::is_hls_manifest(&upstream.content_type, &upstream.body) {
        let body = String::from_utf8_lossy(&upstream.body).into_owned();
        let context = RewriteContext::new(target);
        let rewritten = rewrite::rewrite_manifest(&body, &context, 0, state.config.max_recursion);
        return Ok(respond::manifest(
            rewritten,
            &upstream.content_type,
            state.config.cache_ttl,
        ));
    }

    Ok(respond::passthrough(upstream))
}

/// Answer CORS preflights without touching upstream.
pub async fn handle_preflight() -> Response {
    respond::preflight()
}

/// Everything after the proxy prefix, percent-encoding and query intact.
fn raw_target(uri: &Uri) -> &str {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    path_and_query
        .strip_prefix(PROXY_PREFIX)
        .unwrap_or(path_and_query)
        .trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_target_keeps_encoding() {
        let uri: Uri = "/proxy/https%3A%2F%2Fhost.example%2Fa.m3u8".parse().unwrap();
        assert_eq!(raw_target(&uri), "https%3A%2F%2Fhost.example%2Fa.m3u8");
    }

    #[test]
    fn test_raw_target_keeps_query() {
        let uri: Uri = "/proxy/https://host.example/a.m3u8?token=1".parse().unwrap();
        assert_eq!(raw_target(&uri), "https://host.example/a.m3u8?token=1");
    }

    #[test]
    fn test_raw_target_empty_tail() {
        let uri: Uri = "/proxy".parse().unwrap();
        assert_eq!(raw_target(&uri), "");
        let uri: Uri = "/proxy/".parse().unwrap();
        assert_eq!(raw_target(&uri), "");
    }
}
