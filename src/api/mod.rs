//! API module for HTTP, WebSocket and SSE endpoints
//!
//! - `rest`: alert ingress, alert queries, chain validation and stats
//! - `websocket`: `/ws` live feed for SOC consoles
//! - `sse`: `/api/alerts/stream` live feed for consoles without WebSocket

pub mod http;
pub mod rest;
pub mod sse;
pub mod state;
pub mod websocket;

pub use http::create_router;
pub use state::AppState;
