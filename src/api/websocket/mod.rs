//! WebSocket module for real-time alert updates
//!
//! Provides WebSocket endpoint at `/ws` for pushing ledger events to connected clients.
//!
//! ## Features
//! - `chain_stats` and `chain_status` snapshot on connect
//! - `new_alert` for every durably recorded block
//! - Sequence ID tracking for gap detection
//! - `{"type":"snapshot"}` to resync after a `lagged` notice

pub mod handler;

pub use handler::ws_handler;
