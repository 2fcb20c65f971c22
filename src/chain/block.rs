//! Block: one immutable, hash-linked alert record

use serde_json::Value;

use super::hash;
use crate::types::{AlertType, BlockRecord, Severity};
use crate::utils::now_iso8601;

/// An immutable ledger entry
///
/// Fields are private: once a block exists its contents never change.
/// Tampering can only happen to a [`BlockRecord`] outside the chain, and is
/// caught when the record is reloaded and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    index: u64,
    timestamp: String,
    alert_type: AlertType,
    severity: Severity,
    payload: Value,
    previous_hash: String,
    nonce: u64,
    hash: String,
}

impl Block {
    /// Create a block stamped with the current instant and hash it
    pub fn new(
        index: u64,
        alert_type: AlertType,
        severity: Severity,
        payload: Value,
        previous_hash: impl Into<String>,
    ) -> Self {
        let mut block = Self {
            index,
            timestamp: now_iso8601(),
            alert_type,
            severity,
            payload,
            previous_hash: previous_hash.into(),
            nonce: 0,
            hash: String::new(),
        };
        block.hash = hash::compute_hash(&block);
        block
    }

    /// Rebuild a block from stored fields, keeping the stored hash as-is
    pub fn from_record(record: BlockRecord) -> Self {
        Self {
            index: record.index,
            timestamp: record.timestamp,
            alert_type: record.alert_type,
            severity: record.severity,
            payload: record.payload,
            previous_hash: record.previous_hash,
            nonce: record.nonce,
            hash: record.hash,
        }
    }

    pub fn to_record(&self) -> BlockRecord {
        BlockRecord {
            index: self.index,
            timestamp: self.timestamp.clone(),
            alert_type: self.alert_type.clone(),
            severity: self.severity.clone(),
            payload: self.payload.clone(),
            previous_hash: self.previous_hash.clone(),
            nonce: self.nonce,
            hash: self.hash.clone(),
        }
    }

    /// Recompute the digest from the stored fields (timestamp and nonce
    /// included), ignoring the stored hash
    pub fn compute_hash(&self) -> String {
        hash::compute_hash(self)
    }

    /// Whether the stored hash matches the recomputed one
    pub fn has_valid_hash(&self) -> bool {
        self.hash == self.compute_hash()
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn alert_type(&self) -> &AlertType {
        &self.alert_type
    }

    pub fn severity(&self) -> &Severity {
        &self.severity
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl From<BlockRecord> for Block {
    fn from(record: BlockRecord) -> Self {
        Self::from_record(record)
    }
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        block.to_record()
    }
}
