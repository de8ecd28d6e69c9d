//! regcollect web server
//!
//! Run with: cargo run -p regcollect-web

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use regcollect_web::config::Config;
use regcollect_web::router::build_router;
use regcollect_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("regcollect=debug,info")),
        )
        .init();

    info!("Starting regcollect web server...");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!("Could not load config ({}); using defaults", e);
            Config::default()
        }
    }
    .apply_env_overrides();

    info!("Backend API: {}", config.backend.base_url);
    let bind = config.server.bind.clone();

    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
