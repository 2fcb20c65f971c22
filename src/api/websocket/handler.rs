//! WebSocket connection handler

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::broadcast::{ClientMessage, NoticeMessage};

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    // Subscribe before the snapshot so nothing recorded in between is lost
    let mut rx = state.subscribe();
    info!(
        subscribers = state.ledger.broadcaster().subscriber_count(),
        "dashboard client connected"
    );

    if !send_snapshot(&mut socket, &state).await {
        return; // Client disconnected immediately
    }

    loop {
        tokio::select! {
            // Ledger events to client
            result = rx.recv() => {
                match result {
                    Ok(msg) => {
                        if !send_json(&mut socket, &msg).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        // Client is too slow; tell it to ask for a snapshot
                        debug!(missed = n, "websocket client lagged");
                        if !send_json(&mut socket, &NoticeMessage::lagged(n)).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break; // Channel closed
                    }
                }
            }

            // Handle client messages
            result = socket.recv() => {
                match result {
                    Some(Ok(msg)) => {
                        if !handle_client_message(msg, &mut socket, &state).await {
                            break;
                        }
                    }
                    Some(Err(_)) => break, // WebSocket error
                    None => break, // Client disconnected
                }
            }
        }
    }

    info!("dashboard client disconnected");
}

/// Handle a message from the client
/// Returns false if the connection should be closed
async fn handle_client_message(msg: Message, socket: &mut WebSocket, state: &AppState) -> bool {
    match msg {
        Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::Ping) => send_json(socket, &NoticeMessage::pong()).await,
            Ok(ClientMessage::Snapshot) => send_snapshot(socket, state).await,
            Err(_) => true, // Ignore unknown messages
        },
        Message::Binary(_) => true,
        Message::Ping(data) => socket.send(Message::Pong(data)).await.is_ok(),
        Message::Pong(_) => true,
        Message::Close(_) => false,
    }
}

/// Send current stats and integrity status to this client only
async fn send_snapshot(socket: &mut WebSocket, state: &AppState) -> bool {
    for msg in state.snapshot_messages() {
        if !send_json(socket, &msg).await {
            return false;
        }
    }
    true
}

/// Returns false once the client is gone
async fn send_json<T: Serialize>(socket: &mut WebSocket, value: &T) -> bool {
    match serde_json::to_string(value) {
        Ok(json) => socket.send(Message::Text(json)).await.is_ok(),
        Err(_) => true,
    }
}
