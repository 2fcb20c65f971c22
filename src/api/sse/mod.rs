//! SSE (Server-Sent Events) module for clients that cannot hold a WebSocket
//!
//! ## Endpoints
//! - `GET /api/alerts/stream` - Snapshot, then every ledger event
//!
//! Events carry the same JSON as the WebSocket feed; the SSE event name is
//! the message `type`.

pub mod handler;

pub use handler::sse_handler;
