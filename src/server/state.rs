use crate::{config::Config, proxy::UpstreamClient};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub client: UpstreamClient,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            client: UpstreamClient::new(config.fetch_timeout_secs),
            config: Arc::new(config),
        }
    }
}
