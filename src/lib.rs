//! Alert Ledger
//!
//! A tamper-evident ledger of security alerts. Every alert becomes a block
//! whose SHA-256 hash covers its content and the hash of the block before it,
//! so editing any stored block breaks the chain from that point on.
//!
//! # Features
//!
//! - **Hash Chain**: Canonical JSON hashing with full-chain validation
//! - **Durable**: Blocks are persisted before anyone is told about them
//! - **Serialized Writes**: A single append lock, so the chain never forks
//! - **Real-time**: WebSocket and SSE feeds with snapshot-on-subscribe
//! - **Reporting**: Severity and alert-type counts, integrity reports
//!
//! # Modules
//!
//! - `types`: Wire types (AlertType, Severity, BlockRecord, ChainStats)
//! - `chain`: Blocks, canonical hashing and the in-memory chain
//! - `store`: Block persistence (JSONL file or memory)
//! - `broadcast`: Sequenced fan-out of ledger events
//! - `service`: The single writer tying chain, store and broadcast together
//! - `api`: Axum router, REST handlers, WebSocket and SSE
//! - `config`: Environment configuration
//! - `utils`: Utility functions (timestamps)
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use alert_ledger::{AlertType, EventBroadcaster, LedgerService, MemoryBlockStore, Severity};
//!
//! fn main() {
//!     let ledger = LedgerService::bootstrap(
//!         Box::new(MemoryBlockStore::new()),
//!         Arc::new(EventBroadcaster::default()),
//!     )
//!     .unwrap();
//!     let block = ledger
//!         .record_alert(AlertType::Phishing, Severity::High, serde_json::json!({"sender": "x@y.z"}))
//!         .unwrap();
//!     println!("recorded block #{} {}", block.index, block.hash);
//! }
//! ```

pub mod api;
pub mod broadcast;
pub mod chain;
pub mod config;
pub mod service;
pub mod store;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use broadcast::{BroadcastMessage, EventBroadcaster, LedgerEvent};
pub use chain::{compute_hash, Block, Chain, ChainError, ChainViolation};
pub use config::{ConfigError, LedgerConfig, StoreBackend};
pub use service::{HealthReport, LedgerError, LedgerResult, LedgerService, LockdownRequest};
pub use store::{
    AlertPage, AlertQuery, BlockStore, JsonlBlockStore, MemoryBlockStore, StoreConfig, StoreError,
};
pub use types::{AlertType, BlockRecord, ChainStats, ChainStatus, Severity, SeverityCounts};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
