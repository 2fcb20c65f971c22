//! Hash-chained alert ledger
//!
//! - `block`: immutable block construction and reconstruction
//! - `hash`: canonical serialization and SHA-256 digest
//! - `ledger`: the chain itself (append, validate, load, stats)
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ #0 GENESIS   │◄──│ #1 PHISHING  │◄──│ #2 MALWARE   │
//! │ prev: "0"    │   │ prev: h(#0)  │   │ prev: h(#1)  │
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! Tampering with any stored field changes the recomputed hash of that block;
//! tampering with a stored hash breaks the link from the next block.

mod block;
mod hash;
mod ledger;

pub use block::Block;
pub use hash::{canonical_bytes, compute_hash, GENESIS_PREVIOUS_HASH};
pub use ledger::{genesis_payload, Chain, ChainViolation};

use thiserror::Error;

/// Precondition violations on chain mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("genesis block requires an empty chain, found {blocks} block(s)")]
    GenesisExists { blocks: usize },

    #[error("chain has no blocks; create the genesis block or load from storage first")]
    Uninitialized,

    #[error("no index follows the tail block #{tail}")]
    IndexExhausted { tail: u64 },
}

pub type ChainResult<T> = Result<T, ChainError>;
