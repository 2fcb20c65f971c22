//! Block Store - durable persistence for chain blocks
//!
//! Blocks are keyed uniquely by `index`. The store is the durable record of
//! the ledger: the in-memory chain is rebuilt from it at startup, and alert
//! queries are served from it.
//!
//! - `JsonlBlockStore`: append-only `blocks.jsonl`, fsynced per write
//! - `MemoryBlockStore`: volatile store for tests and ephemeral runs
//!
//! ```text
//! Write Path:
//! ┌─────────────┐    ┌──────────────┐    ┌──────────────────┐
//! │ Chain       │───►│ check index  │───►│ append + fsync   │
//! │ .append()   │    │ tail + 1     │    │ blocks.jsonl     │
//! └─────────────┘    └──────────────┘    └──────────────────┘
//!
//! Read Path (Startup):
//! ┌───────────────┐    ┌──────────────────┐
//! │ blocks.jsonl  │───►│ Chain::load_from │───► validate ───► Ready!
//! └───────────────┘    └──────────────────┘
//! ```

mod jsonl;
mod memory;
mod query;

pub use jsonl::{JsonlBlockStore, StoreConfig};
pub use memory::MemoryBlockStore;
pub use query::{AlertPage, AlertQuery};

use serde::Serialize;
use thiserror::Error;

use crate::types::BlockRecord;

/// Errors that can occur in block store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A block with this index is already stored; fatal for ledger integrity
    #[error("block #{index} is already stored")]
    DuplicateIndex { index: u64 },

    #[error("block #{index} is out of sequence, expected #{expected}")]
    OutOfSequence { index: u64, expected: u64 },

    #[error("no index follows the stored tail block #{tail}")]
    IndexExhausted { tail: u64 },
}

/// Result type for block store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage summary reported by health checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub backend: &'static str,
    pub records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
}

/// Durable store for blocks, keyed by index
pub trait BlockStore: Send {
    /// Every stored record, in index order
    fn load_all(&self) -> StoreResult<Vec<BlockRecord>>;

    /// Persist one record. Must be the next index after the stored tail.
    fn insert(&mut self, record: &BlockRecord) -> StoreResult<()>;

    /// Filtered, paginated view, newest first
    fn query(&self, query: &AlertQuery) -> StoreResult<AlertPage>;

    fn stats(&self) -> StoreStats;
}

/// Index rule shared by the stores: unique and gap-free
pub(crate) fn check_next_index(stored: &[BlockRecord], index: u64) -> StoreResult<()> {
    let expected = match stored.last() {
        Some(tail) => tail
            .index
            .checked_add(1)
            .ok_or(StoreError::IndexExhausted { tail: tail.index })?,
        None => 0,
    };
    if index == expected {
        return Ok(());
    }
    if stored.iter().any(|r| r.index == index) {
        return Err(StoreError::DuplicateIndex { index });
    }
    Err(StoreError::OutOfSequence { index, expected })
}
