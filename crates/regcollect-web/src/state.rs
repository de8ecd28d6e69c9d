//! Shared application state for the web server.

use std::sync::Arc;

use regcollect_client::ApiClient;

use crate::config::Config;
use crate::view::Views;

/// Shared state injected into every Axum handler. Immutable after start-up.
pub struct AppState {
    pub config: Config,
    /// Unauthenticated client; sessions derive token-bearing copies from it.
    pub api: ApiClient,
    pub views: Views,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let api = ApiClient::new(&config.backend.base_url, config.backend.timeout())?;
        let views = Views::new()?;
        Ok(Self { config, api, views })
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.session.cookie_name
    }
}

pub type SharedState = Arc<AppState>;
