//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use super::rest::{alerts, chain};
use super::sse::sse_handler;
use super::state::AppState;
use super::websocket::ws_handler;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // Dashboards are served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Real-time feeds
        .route("/ws", get(ws_handler))
        .route("/api/alerts/stream", get(sse_handler))
        // Health check
        .route("/health", get(health_check))
        // REST API endpoints
        .route(
            "/api/alerts",
            get(alerts::list_alerts).post(alerts::create_alert),
        )
        .route("/api/alerts/lockdown", post(alerts::engage_lockdown))
        .route("/api/alerts/latest", get(alerts::latest_alerts))
        .route("/api/alerts/chain/validate", get(chain::validate_chain))
        .route("/api/alerts/chain/stats", get(chain::chain_stats))
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.ledger.health())
}
