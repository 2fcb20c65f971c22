//! Volatile block store

use super::{check_next_index, AlertPage, AlertQuery, BlockStore, StoreResult, StoreStats};
use crate::types::BlockRecord;

/// Block store that keeps records in memory only
#[derive(Debug, Default, Clone)]
pub struct MemoryBlockStore {
    records: Vec<BlockRecord>,
}

impl MemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already-stored records, e.g. to simulate a restart
    pub fn with_records(mut records: Vec<BlockRecord>) -> Self {
        records.sort_by_key(|r| r.index);
        Self { records }
    }
}

impl BlockStore for MemoryBlockStore {
    fn load_all(&self) -> StoreResult<Vec<BlockRecord>> {
        Ok(self.records.clone())
    }

    fn insert(&mut self, record: &BlockRecord) -> StoreResult<()> {
        check_next_index(&self.records, record.index)?;
        self.records.push(record.clone());
        Ok(())
    }

    fn query(&self, query: &AlertQuery) -> StoreResult<AlertPage> {
        Ok(query.apply(&self.records))
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            backend: "memory",
            records: self.records.len(),
            bytes: None,
        }
    }
}
