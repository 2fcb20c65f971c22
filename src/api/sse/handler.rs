//! SSE stream handler

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;
use tokio::sync::broadcast;

use crate::api::state::AppState;
use crate::broadcast::{BroadcastMessage, NoticeMessage};

/// GET /api/alerts/stream - SSE stream of ledger events
pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Subscribe before taking the snapshot
    let mut event_rx = state.subscribe();
    let snapshot = state.snapshot_messages();

    let stream = async_stream::stream! {
        for msg in snapshot {
            yield Ok::<_, Infallible>(to_event(&msg));
        }

        loop {
            match event_rx.recv().await {
                Ok(msg) => yield Ok(to_event(&msg)),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Client is too slow
                    yield Ok(Event::default()
                        .event("error")
                        .data(serde_json::to_string(&NoticeMessage::lagged(n)).unwrap_or_default()));
                }
                Err(broadcast::error::RecvError::Closed) => {
                    break;
                }
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default().interval(Duration::from_secs(30)))
}

fn to_event(msg: &BroadcastMessage) -> Event {
    Event::default()
        .event(msg.event.kind())
        .id(msg.sequence_id.to_string())
        .data(serde_json::to_string(msg).unwrap_or_default())
}
