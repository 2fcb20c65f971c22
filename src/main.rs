//! Alert Ledger Server - Binary Entry Point
//!
//! Serves the REST API, WebSocket feed and SSE stream for the alert ledger.

use std::sync::Arc;

use alert_ledger::api::{create_router, AppState};
use alert_ledger::{EventBroadcaster, LedgerConfig, LedgerService};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug for verbose output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = LedgerConfig::from_env()?;
    info!(
        version = alert_ledger::VERSION,
        store = ?config.store,
        data_dir = %config.data_dir.display(),
        "starting alert ledger"
    );

    let store = config.open_store()?;
    let broadcaster = Arc::new(EventBroadcaster::new(config.broadcast_capacity));
    let ledger = Arc::new(LedgerService::bootstrap(store, broadcaster)?);
    info!(blocks = ledger.block_count(), "ledger ready");

    let app = create_router(Arc::new(AppState::new(ledger)));

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(address = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("alert ledger stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
