//! Alert endpoints: ingress and queries

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ApiError;
use crate::api::state::AppState;
use crate::service::LockdownRequest;
use crate::store::AlertQuery;
use crate::types::{AlertType, BlockRecord, ParseAlertError, Severity};

const MAX_LIMIT: usize = 1000;

/// Body of POST /api/alerts
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub alert_type: Option<String>,
    pub severity: Option<String>,
    pub payload: Option<Value>,
}

impl CreateAlertRequest {
    /// Validate before anything touches the chain
    pub fn validate(self) -> Result<(AlertType, Severity, Value), ApiError> {
        let (Some(alert_type), Some(severity), Some(payload)) =
            (self.alert_type, self.severity, self.payload.filter(|p| !p.is_null()))
        else {
            return Err(ApiError::bad_request(
                "Missing required fields: alertType, severity, payload",
            ));
        };

        let alert_type: AlertType = alert_type
            .parse()
            .map_err(|e: ParseAlertError| ApiError::bad_request(e.to_string()))?;
        if alert_type.is_genesis() {
            return Err(ApiError::bad_request("GENESIS is reserved for the first block"));
        }

        let severity: Severity = severity
            .parse()
            .map_err(|e: ParseAlertError| ApiError::bad_request(e.to_string()))?;

        if !payload.is_object() {
            return Err(ApiError::bad_request("payload must be a JSON object"));
        }

        Ok((alert_type, severity, payload))
    }
}

/// Response for a newly recorded block
#[derive(Debug, Serialize)]
pub struct RecordedResponse {
    pub message: &'static str,
    pub block: BlockRecord,
}

/// POST /api/alerts - Append an alert block, persist it and broadcast it
pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    request: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let (alert_type, severity, payload) = request.validate()?;

    let ledger = state.ledger.clone();
    let block = tokio::task::spawn_blocking(move || {
        ledger.record_alert(alert_type, severity, payload)
    })
    .await??;

    Ok((
        StatusCode::CREATED,
        Json(RecordedResponse {
            message: "Alert recorded on blockchain",
            block,
        }),
    ))
}

/// POST /api/alerts/lockdown - Record a firewall lockdown for an address
pub async fn engage_lockdown(
    State(state): State<Arc<AppState>>,
    request: Result<Json<LockdownRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = request?;
    let ledger = state.ledger.clone();
    let block = tokio::task::spawn_blocking(move || ledger.engage_lockdown(request)).await??;

    Ok((
        StatusCode::CREATED,
        Json(RecordedResponse {
            message: "Firewall lockdown engaged and recorded on blockchain",
            block,
        }),
    ))
}

/// Query parameters for GET /api/alerts
#[derive(Debug, Deserialize)]
pub struct ListAlertsParams {
    pub severity: Option<String>,
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: usize,
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_list_limit() -> usize {
    50
}

fn default_page() -> usize {
    1
}

impl ListAlertsParams {
    fn into_query(self) -> Result<AlertQuery, ApiError> {
        let mut query =
            AlertQuery::default().with_page(self.page.max(1), self.limit.clamp(1, MAX_LIMIT));

        if let Some(severity) = self.severity.filter(|s| !s.is_empty()) {
            let severity = severity
                .parse()
                .map_err(|e: ParseAlertError| ApiError::bad_request(e.to_string()))?;
            query = query.with_severity(severity);
        }
        if let Some(alert_type) = self.alert_type.filter(|t| !t.is_empty()) {
            let alert_type = alert_type
                .parse()
                .map_err(|e: ParseAlertError| ApiError::bad_request(e.to_string()))?;
            query = query.with_alert_type(alert_type);
        }

        Ok(query)
    }
}

/// GET /api/alerts - Stored blocks, newest first
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListAlertsParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let query = params.into_query()?;
    let page = state.ledger.query(&query)?;
    Ok(Json(page))
}

/// Query parameters for GET /api/alerts/latest
#[derive(Debug, Deserialize)]
pub struct LatestParams {
    #[serde(default = "default_latest_limit")]
    pub limit: usize,
}

fn default_latest_limit() -> usize {
    10
}

/// GET /api/alerts/latest - Newest alerts, genesis excluded
pub async fn latest_alerts(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LatestParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params?;
    let query = AlertQuery::latest(params.limit.clamp(1, MAX_LIMIT));
    let page = state.ledger.query(&query)?;
    Ok(Json(page.blocks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(alert_type: Option<&str>, severity: Option<&str>, payload: Option<Value>) -> CreateAlertRequest {
        CreateAlertRequest {
            alert_type: alert_type.map(String::from),
            severity: severity.map(String::from),
            payload,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let (alert_type, severity, payload) =
            request(Some("PHISHING"), Some("HIGH"), Some(json!({"sender": "a@b.c"})))
                .validate()
                .unwrap();
        assert_eq!(alert_type, AlertType::Phishing);
        assert_eq!(severity, Severity::High);
        assert_eq!(payload["sender"], "a@b.c");
    }

    #[test]
    fn test_validate_missing_fields() {
        for req in [
            request(None, Some("HIGH"), Some(json!({}))),
            request(Some("PHISHING"), None, Some(json!({}))),
            request(Some("PHISHING"), Some("HIGH"), None),
            request(Some("PHISHING"), Some("HIGH"), Some(Value::Null)),
        ] {
            let err = req.validate().unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.error, "Missing required fields: alertType, severity, payload");
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(request(Some("PHISHING"), Some("SEVERE"), Some(json!({}))).validate().is_err());
        assert!(request(Some("phish"), Some("LOW"), Some(json!({}))).validate().is_err());
        assert!(request(Some("GENESIS"), Some("LOW"), Some(json!({}))).validate().is_err());
        assert!(request(Some("MALWARE"), Some("LOW"), Some(json!([1, 2]))).validate().is_err());
    }

    #[test]
    fn test_list_params_into_query() {
        let params = ListAlertsParams {
            severity: Some("CRITICAL".to_string()),
            alert_type: Some("DDOS".to_string()),
            limit: 5000,
            page: 0,
        };
        let query = params.into_query().unwrap();
        assert_eq!(query.severity, Some(Severity::Critical));
        assert_eq!(query.alert_type, Some(AlertType::Ddos));
        assert_eq!(query.limit, MAX_LIMIT);
        assert_eq!(query.page, 1);
    }
}
