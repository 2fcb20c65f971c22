//! Chain endpoints - integrity report and aggregate counts

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::api::state::AppState;

/// GET /api/alerts/chain/validate - Re-verify every block
pub async fn validate_chain(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ledger = state.ledger.clone();
    // Full O(n) rehash; keep it off the async workers
    match tokio::task::spawn_blocking(move || ledger.validate()).await {
        Ok(status) => Json(status).into_response(),
        Err(e) => super::ApiError::from(e).into_response(),
    }
}

/// GET /api/alerts/chain/stats - Counts by severity and alert type
pub async fn chain_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.ledger.stats())
}
