//! End-to-end tests through the HTTP router

use std::sync::Arc;

use alert_ledger::api::{create_router, AppState};
use alert_ledger::store::{StoreError, StoreResult, StoreStats};
use alert_ledger::{
    AlertPage, AlertQuery, BlockRecord, BlockStore, EventBroadcaster, LedgerConfig, LedgerService,
    MemoryBlockStore,
};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use futures::StreamExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

/// Persists genesis only, then every write fails
struct ReadOnlyDisk {
    inner: MemoryBlockStore,
}

impl BlockStore for ReadOnlyDisk {
    fn load_all(&self) -> StoreResult<Vec<BlockRecord>> {
        self.inner.load_all()
    }

    fn insert(&mut self, record: &BlockRecord) -> StoreResult<()> {
        if record.index > 0 {
            return Err(StoreError::Io(std::io::Error::other("read-only file system")));
        }
        self.inner.insert(record)
    }

    fn query(&self, query: &AlertQuery) -> StoreResult<AlertPage> {
        self.inner.query(query)
    }

    fn stats(&self) -> StoreStats {
        self.inner.stats()
    }
}

fn app_with_store(store: Box<dyn BlockStore>) -> (Router, Arc<AppState>) {
    let ledger = LedgerService::bootstrap(store, Arc::new(EventBroadcaster::new(32))).unwrap();
    let state = Arc::new(AppState::new(Arc::new(ledger)));
    (create_router(state.clone()), state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_alert(alert_type: &str, severity: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/alerts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"alertType": alert_type, "severity": severity, "payload": payload}).to_string(),
        ))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_alerts_survive_restart_through_api() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let config = LedgerConfig::default().with_data_dir(temp_dir.path());

    {
        let (app, _) = app_with_store(config.open_store().unwrap());
        for (alert_type, severity) in [("PHISHING", "HIGH"), ("MALWARE", "CRITICAL"), ("PHISHING", "LOW")] {
            let response = app
                .clone()
                .oneshot(post_alert(alert_type, severity, json!({"source": "mail-gw"})))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }
    }

    let (app, _) = app_with_store(config.open_store().unwrap());

    let response = app
        .clone()
        .oneshot(get("/api/alerts/chain/validate"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["valid"], true);
    assert_eq!(body["totalBlocks"], 4);

    let response = app
        .clone()
        .oneshot(get("/api/alerts?type=PHISHING&limit=1&page=2"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["pages"], 2);
    assert_eq!(body["blocks"][0]["index"], 1);

    let response = app.oneshot(get("/api/alerts/chain/stats")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["totalBlocks"], 4);
    assert_eq!(body["typeCounts"]["PHISHING"], 2);
    assert_eq!(body["typeCounts"]["MALWARE"], 1);
    assert!(body["genesisTimestamp"].is_string());
}

#[tokio::test]
async fn test_persistence_failure_is_500_then_503() {
    let (app, state) = app_with_store(Box::new(ReadOnlyDisk {
        inner: MemoryBlockStore::new(),
    }));
    let mut rx = state.subscribe();

    let response = app
        .clone()
        .oneshot(post_alert("INTRUSION", "CRITICAL", json!({"port": 3389})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Alert block #1 was not durably recorded.");

    // Nothing was announced for the lost block
    assert!(rx.try_recv().is_err());

    let response = app
        .clone()
        .oneshot(post_alert("INTRUSION", "CRITICAL", json!({"port": 3389})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let response = app.oneshot(get("/health")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_sse_stream_starts_with_snapshot() {
    let (app, _) = app_with_store(Box::new(MemoryBlockStore::new()));

    let response = app.oneshot(get("/api/alerts/stream")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let mut body = response.into_body().into_data_stream();
    let first = body.next().await.unwrap().unwrap();
    let first = String::from_utf8(first.to_vec()).unwrap();
    assert!(first.contains("event: chain_stats"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _) = app_with_store(Box::new(MemoryBlockStore::new()));
    let response = app.oneshot(get("/api/nothing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
