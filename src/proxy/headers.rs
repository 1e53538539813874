use axum::http::{header, HeaderMap, HeaderName, HeaderValue};
use rand::seq::IndexedRandom;
use url::Url;

const DEFAULT_ACCEPT: &str = "*/*";
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Build the header set for an upstream request.
///
/// The User-Agent is drawn at random from the configured pool on every
/// request; the client's own value is never forwarded. Accept,
/// Accept-Language and Referer are forwarded as-is, with browser-like
/// defaults filling the gaps; the Referer fallback points at the target's
/// own origin. A header whose chosen value is empty is omitted entirely.
pub fn outbound_headers(inbound: &HeaderMap, target: &Url, user_agents: &[String]) -> HeaderMap {
    let mut headers = HeaderMap::new();

    // The pool, not the client, decides the User-Agent
    set_header(&mut headers, header::USER_AGENT, pick_user_agent(user_agents));
    forward_or(&mut headers, inbound, header::ACCEPT, || {
        DEFAULT_ACCEPT.to_string()
    });
    forward_or(&mut headers, inbound, header::ACCEPT_LANGUAGE, || {
        DEFAULT_ACCEPT_LANGUAGE.to_string()
    });
    forward_or(&mut headers, inbound, header::REFERER, || origin_of(target));

    headers
}

/// Forward the client's value when present and non-empty, otherwise fall
/// back to `default`. Empty fallbacks leave the header out.
fn forward_or(
    headers: &mut HeaderMap,
    inbound: &HeaderMap,
    name: HeaderName,
    default: impl FnOnce() -> String,
) {
    if let Some(value) = inbound.get(&name) {
        if !value.is_empty() {
            headers.insert(name, value.clone());
            return;
        }
    }
    set_header(headers, name, default());
}

/// Insert `value` under `name`, skipping empty or malformed values.
fn set_header(headers: &mut HeaderMap, name: HeaderName, value: String) {
    if value.is_empty() {
        return;
    }
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(name, value);
    }
}

fn pick_user_agent(pool: &[String]) -> String {
    let mut rng = rand::rng();
    pool.choose(&mut rng).cloned().unwrap_or_default()
}

/// `scheme://host[:port]/` for the target, used as the Referer fallback.
fn origin_of(target: &Url) -> String {
    format!("{}/", target.origin().ascii_serialization())
}
