use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use super::{
    handlers::{handle_preflight, handle_proxy},
    state::AppState,
};
use crate::{config::Config, PROXY_PREFIX};

/// Create the application router.
///
/// CORS is stamped by the response emitter rather than a middleware
/// layer: preflights must come back 204 with the exact header set players
/// expect, and error responses need the same treatment as successes.
pub fn build_router(config: Config) -> Router {
    let state = AppState::new(config);

    // The bare prefix route exists so an empty target reaches the
    // resolver and earns a 400 instead of a routing 404.
    Router::new()
        .route(PROXY_PREFIX, get(handle_proxy).options(handle_preflight))
        .route(
            &format!("{}/{{*target}}", PROXY_PREFIX),
            get(handle_proxy).options(handle_preflight),
        )
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
