//! REST API module for HTTP endpoints
//!
//! - `POST /api/alerts` - Record an alert on the chain
//! - `POST /api/alerts/lockdown` - Engage a firewall lockdown
//! - `GET /api/alerts` - Stored alerts, filtered and paginated
//! - `GET /api/alerts/latest` - Newest alerts
//! - `GET /api/alerts/chain/validate` - Full integrity check
//! - `GET /api/alerts/chain/stats` - Aggregate counts

pub mod alerts;
pub mod chain;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use crate::service::LedgerError;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
            status: StatusCode::BAD_REQUEST,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "SERVICE_UNAVAILABLE".to_string(),
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidRequest(message) => ApiError::bad_request(message),
            LedgerError::Diverged => ApiError::unavailable(err.to_string()),
            LedgerError::Persistence { index, .. } => {
                ApiError::internal(format!("Alert block #{} was not durably recorded.", index))
            }
            other => {
                error!(error = %other, "ledger operation failed");
                ApiError::internal("Ledger operation failed.")
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        error!(error = %err, "ledger task aborted");
        ApiError::internal("Ledger task aborted.")
    }
}
