use axum::{
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{proxy::UpstreamResponse, rewrite};

pub const ALLOW_METHODS: &str = "GET, HEAD, OPTIONS";
pub const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Range";
pub const EXPOSE_HEADERS: &str = "Content-Length, Content-Range, Accept-Ranges";
pub const PREFLIGHT_MAX_AGE: &str = "86400";

/// Cache-Control applied to passthrough bodies whose upstream sent none.
const DEFAULT_CACHE_CONTROL: &str = "public, max-age=3600";

/// Upstream headers worth relaying to the player. Everything else
/// (hop-by-hop headers, cookies, upstream CORS) is dropped.
const FORWARDED_HEADERS: &[HeaderName] = &[
    header::CONTENT_TYPE,
    header::CACHE_CONTROL,
    header::EXPIRES,
    header::LAST_MODIFIED,
    header::ETAG,
    header::CONTENT_DISPOSITION,
    header::CONTENT_RANGE,
    header::ACCEPT_RANGES,
];

/// Stamp the CORS headers every proxy response carries, errors included.
pub fn apply_cors(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(EXPOSE_HEADERS),
    );
}

/// Answer a CORS preflight. 204, no body, the full allow set.
pub fn preflight() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static(PREFLIGHT_MAX_AGE),
    );
    response
}

/// Emit a rewritten manifest.
///
/// Content-Type is forced to a playlist MIME type (players refuse
/// manifests served as text/plain) and Cache-Control is pinned to the
/// configured TTL rather than whatever upstream said.
pub fn manifest(body: String, upstream_content_type: &str, cache_ttl: u64) -> Response {
    let content_type = rewrite::manifest_content_type(upstream_content_type);
    let cache_control = format!("public, max-age={}", cache_ttl);

    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CACHE_CONTROL, cache_control),
        ],
        body,
    )
        .into_response();
    apply_cors(response.headers_mut());
    response
}

/// Relay a non-manifest upstream body unchanged.
///
/// Headers mirror upstream through the allow-list; upstream's
/// Cache-Control wins when present, and bodies without one get a modest
/// default so players do not hammer origins through us.
pub fn passthrough(upstream: UpstreamResponse) -> Response {
    let mut response = (StatusCode::OK, upstream.body).into_response();
    let headers = response.headers_mut();

    // Content-Type must mirror upstream exactly, including its absence
    headers.remove(header::CONTENT_TYPE);
    for name in FORWARDED_HEADERS {
        if let Some(value) = upstream.headers.get(name) {
            headers.insert(name.clone(), value.clone());
        }
    }
    if !headers.contains_key(header::CACHE_CONTROL) {
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(DEFAULT_CACHE_CONTROL),
        );
    }

    apply_cors(headers);
    response
}
