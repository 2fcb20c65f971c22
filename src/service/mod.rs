//! Ledger service - the single writer of the alert chain
//!
//! Owns the in-memory chain, the durable block store and the broadcaster,
//! and runs every append through the same serialized path:
//!
//! ```text
//! ┌────────────┐   ┌──────────────┐   ┌──────────────┐   ┌─────────────┐
//! │ append lock│──►│ Chain.append │──►│ store.insert │──►│ broadcast   │
//! │ (store)    │   │ (write lock) │   │ (fsync)      │   │ new_alert   │
//! └────────────┘   └──────────────┘   └──────┬───────┘   └─────────────┘
//!                                            │ failure
//!                                            ▼
//!                                     diverged: appends refused
//!                                     until restart + reload
//! ```

mod ledger;
mod lockdown;

pub use ledger::{ChainHealth, HealthReport, LedgerService};
pub use lockdown::LockdownRequest;

use thiserror::Error;

use crate::chain::ChainError;
use crate::store::StoreError;

/// Errors surfaced to ledger callers
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    /// The block was appended in memory but never became durable.
    /// It is not broadcast and is lost on restart.
    #[error("block #{index} could not be persisted: {source}")]
    Persistence {
        index: u64,
        #[source]
        source: StoreError,
    },

    /// A previous persistence failure left memory ahead of storage
    #[error("ledger is ahead of durable storage after a failed write; restart required")]
    Diverged,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    InvalidRequest(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
