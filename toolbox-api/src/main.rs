//! # AI Toolbox API Server
//!
//! Serves the JSON API backing the AI Toolbox front end.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p toolbox-api
//! ```
//!
//! Set `LOG_FORMAT=json` for structured log lines.

use std::net::SocketAddr;
use toolbox_api::{
    app::{build_router, AppState},
    config::Config,
};
use toolbox_shared::db::RecordStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!(
        "AI Toolbox API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store = RecordStore::new(&config.store.data_dir);
    store.init().await?;
    tracing::info!(data_dir = %store.data_dir().display(), "Record store ready");

    let addr = config.bind_address();
    let environment = config.environment();
    let state = AppState::new(store, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(environment, "Server listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "toolbox_api=debug,toolbox_shared=info,tower_http=debug".into()
            }),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
