use hls_relay::{config, config::Config, server, PROXY_PREFIX};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let default_filter = if config::debug_requested() {
        "hls_relay=debug,tower_http=debug"
    } else {
        "hls_relay=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let addr = config.bind_addr();

    tracing::info!("Starting hls-relay on {}", addr);
    tracing::info!(
        "Serving {}/<encoded-url> ({} user agents, manifest TTL {}s, rewrite depth limit {})",
        PROXY_PREFIX,
        config.user_agents.len(),
        config.cache_ttl,
        config.max_recursion
    );

    let app = server::build_router(config);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
