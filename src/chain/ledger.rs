//! Chain: the ordered, hash-linked sequence of blocks
//!
//! The chain is mutated in exactly two ways: [`Chain::append`] adds one block
//! computed from the current tail, and [`Chain::load_from`] replaces the
//! whole sequence at startup. Everything else is a read-only view.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{json, Value};

use super::block::Block;
use super::hash::GENESIS_PREVIOUS_HASH;
use super::{ChainError, ChainResult};
use crate::types::{AlertType, BlockRecord, ChainStats, ChainStatus, Severity, SeverityCounts};
use crate::utils::now_iso8601;

/// A structural problem found by [`Chain::violations`]
///
/// `index` is the block's position in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainViolation {
    /// Stored hash differs from the hash recomputed from stored fields
    HashMismatch { index: u64 },
    /// `previousHash` differs from the preceding block's stored hash
    BrokenLink { index: u64 },
}

impl ChainViolation {
    pub fn index(&self) -> u64 {
        match self {
            ChainViolation::HashMismatch { index } | ChainViolation::BrokenLink { index } => *index,
        }
    }
}

impl fmt::Display for ChainViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainViolation::HashMismatch { index } => {
                write!(f, "Block {}: Hash mismatch (tampering detected)", index)
            }
            ChainViolation::BrokenLink { index } => {
                write!(f, "Block {}: Previous hash mismatch (chain broken)", index)
            }
        }
    }
}

/// Payload of the genesis block
pub fn genesis_payload() -> Value {
    json!({
        "message": "Alert ledger initialized",
        "system": "ALERT-LEDGER"
    })
}

/// In-memory hash chain
#[derive(Debug, Clone, Default)]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// Create an empty, uninitialized chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an empty chain with the genesis block
    pub fn create_genesis_block(&mut self) -> ChainResult<&Block> {
        if !self.blocks.is_empty() {
            return Err(ChainError::GenesisExists {
                blocks: self.blocks.len(),
            });
        }

        let genesis = Block::new(
            0,
            AlertType::Genesis,
            Severity::Low,
            genesis_payload(),
            GENESIS_PREVIOUS_HASH,
        );
        self.blocks.push(genesis);
        Ok(&self.blocks[0])
    }

    /// Block with the highest index
    pub fn latest_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Append one block linked to the current tail
    ///
    /// Does not persist anything; durability is the caller's job.
    pub fn append(
        &mut self,
        alert_type: AlertType,
        severity: Severity,
        payload: Value,
    ) -> ChainResult<&Block> {
        let tail = self.latest_block().ok_or(ChainError::Uninitialized)?;
        let index = tail
            .index()
            .checked_add(1)
            .ok_or(ChainError::IndexExhausted { tail: tail.index() })?;
        let block = Block::new(
            index,
            alert_type,
            severity,
            payload,
            tail.hash(),
        );
        self.blocks.push(block);
        Ok(&self.blocks[self.blocks.len() - 1])
    }

    /// Full scan of blocks 1..n, in chain order
    ///
    /// Violations are labelled by position, not by the stored `index`
    /// field, which may itself have been altered.
    pub fn violations(&self) -> Vec<ChainViolation> {
        let mut violations = Vec::new();

        for (offset, pair) in self.blocks.windows(2).enumerate() {
            let (previous, current) = (&pair[0], &pair[1]);
            let position = offset as u64 + 1;

            if !current.has_valid_hash() {
                violations.push(ChainViolation::HashMismatch { index: position });
            }

            if current.previous_hash() != previous.hash() {
                violations.push(ChainViolation::BrokenLink { index: position });
            }
        }

        violations
    }

    /// Integrity report over the whole chain
    pub fn validate(&self) -> ChainStatus {
        let errors: Vec<String> = self.violations().iter().map(ToString::to_string).collect();

        ChainStatus {
            valid: errors.is_empty(),
            total_blocks: self.blocks.len() as u64,
            errors,
            last_verified: now_iso8601(),
        }
    }

    /// Replace the whole sequence with stored records, ordered by index
    ///
    /// Stored timestamps, nonces and hashes are kept exactly; nothing is
    /// recomputed until [`Chain::validate`] runs.
    pub fn load_from<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = BlockRecord>,
    {
        let mut blocks: Vec<Block> = records.into_iter().map(Block::from_record).collect();
        blocks.sort_by_key(Block::index);
        self.blocks = blocks;
    }

    /// Aggregate counts over all non-genesis blocks
    pub fn stats(&self) -> ChainStats {
        let mut severity_counts = SeverityCounts::default();
        let mut type_counts: BTreeMap<String, u64> = BTreeMap::new();

        for block in self.blocks.iter().filter(|b| !b.alert_type().is_genesis()) {
            severity_counts.record(block.severity());
            *type_counts
                .entry(block.alert_type().to_string())
                .or_insert(0) += 1;
        }

        ChainStats {
            total_blocks: self.blocks.len() as u64,
            severity_counts,
            type_counts,
            genesis_timestamp: self.blocks.first().map(|b| b.timestamp().to_string()),
            latest_timestamp: self.latest_block().map(|b| b.timestamp().to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Block at `index`, assuming the gap-free layout of a valid chain
    pub fn get(&self, index: u64) -> Option<&Block> {
        let block = self.blocks.get(usize::try_from(index).ok()?)?;
        (block.index() == index).then_some(block)
    }

    /// Stored records of every block, in index order
    pub fn to_records(&self) -> Vec<BlockRecord> {
        self.blocks.iter().map(Block::to_record).collect()
    }
}
