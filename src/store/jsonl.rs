//! JSONL Block Store - append-only file persistence
//!
//! One `BlockRecord` per line in `<data_dir>/blocks.jsonl`. Records are
//! appended with fsync, and mirrored in memory so queries never re-read the
//! file.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{check_next_index, AlertPage, AlertQuery, BlockStore, StoreResult, StoreStats};
use crate::types::BlockRecord;

/// Configuration for the JSONL block store
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the data directory
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
        }
    }
}

impl StoreConfig {
    /// Create config with custom data directory
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get path to blocks.jsonl
    pub fn blocks_path(&self) -> PathBuf {
        self.data_dir.join("blocks.jsonl")
    }
}

/// File-backed block store
pub struct JsonlBlockStore {
    config: StoreConfig,
    records: Vec<BlockRecord>,
}

impl JsonlBlockStore {
    /// Open the store, reading any existing records from disk
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        std::fs::create_dir_all(config.data_dir())?;
        Self::repair_tail(&config.blocks_path())?;
        let mut records = Self::read_records(&config.blocks_path())?;
        records.sort_by_key(|r| r.index);

        debug!(
            path = %config.blocks_path().display(),
            records = records.len(),
            "opened block store"
        );

        Ok(Self { config, records })
    }

    /// Get the configuration
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Deal with a last line left without its newline by an interrupted
    /// write: a complete record gets its newline, anything else is cut off
    /// so the next append starts on a fresh line.
    fn repair_tail(path: &Path) -> StoreResult<()> {
        if !path.exists() {
            return Ok(());
        }

        let content = std::fs::read(path)?;
        if content.is_empty() || content.ends_with(b"\n") {
            return Ok(());
        }

        let line_start = content
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|pos| pos + 1)
            .unwrap_or(0);
        let fragment = String::from_utf8_lossy(&content[line_start..]);

        if BlockRecord::from_json_line(&fragment).is_ok() {
            let mut file = OpenOptions::new().append(true).open(path)?;
            writeln!(file)?;
            file.sync_all()?;
            warn!(path = %path.display(), "terminated last block record");
        } else {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(line_start as u64)?;
            file.sync_all()?;
            warn!(
                path = %path.display(),
                discarded_bytes = content.len() - line_start,
                "discarded partially written block record"
            );
        }

        Ok(())
    }

    fn append_line(file: &mut File, record: &BlockRecord) -> StoreResult<()> {
        let json_line = record.to_json_line()?;
        writeln!(file, "{}", json_line)?;

        // Sync to disk for durability
        file.sync_all()?;
        Ok(())
    }

    /// Read every parseable line; unparseable lines are skipped so a single
    /// damaged record surfaces as a broken link during validation instead of
    /// preventing startup.
    fn read_records(path: &Path) -> StoreResult<Vec<BlockRecord>> {
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(path)?);
        let mut records = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result?;
            if line.trim().is_empty() {
                continue;
            }

            match BlockRecord::from_json_line(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        line = line_num + 1,
                        error = %e,
                        "skipping unreadable block record"
                    );
                }
            }
        }

        Ok(records)
    }
}

impl BlockStore for JsonlBlockStore {
    fn load_all(&self) -> StoreResult<Vec<BlockRecord>> {
        Ok(self.records.clone())
    }

    fn insert(&mut self, record: &BlockRecord) -> StoreResult<()> {
        check_next_index(&self.records, record.index)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.config.blocks_path())?;

        let start = file.metadata()?.len();

        if let Err(e) = Self::append_line(&mut file, record) {
            // Leave no partial line for the next append to land on
            if let Err(rollback) = file.set_len(start) {
                warn!(error = %rollback, "failed to roll back partial block record");
            }
            return Err(e);
        }

        self.records.push(record.clone());
        Ok(())
    }

    fn query(&self, query: &AlertQuery) -> StoreResult<AlertPage> {
        Ok(query.apply(&self.records))
    }

    fn stats(&self) -> StoreStats {
        let bytes = std::fs::metadata(self.config.blocks_path())
            .map(|m| m.len())
            .unwrap_or(0);
        StoreStats {
            backend: "file",
            records: self.records.len(),
            bytes: Some(bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use crate::store::StoreError;
    use crate::types::{AlertType, Severity};
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_store() -> (JsonlBlockStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonlBlockStore::open(StoreConfig::new(temp_dir.path())).unwrap();
        (store, temp_dir)
    }

    fn sample_chain(alerts: usize) -> Chain {
        let mut chain = Chain::new();
        chain.create_genesis_block().unwrap();
        for i in 0..alerts {
            chain
                .append(AlertType::Anomaly, Severity::Medium, json!({"seq": i}))
                .unwrap();
        }
        chain
    }

    #[test]
    fn test_insert_and_reopen() {
        let (mut store, temp_dir) = create_test_store();
        let chain = sample_chain(3);

        for record in chain.to_records() {
            store.insert(&record).unwrap();
        }

        let reopened = JsonlBlockStore::open(StoreConfig::new(temp_dir.path())).unwrap();
        assert_eq!(reopened.load_all().unwrap(), chain.to_records());
        assert_eq!(reopened.stats().records, 4);
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let (mut store, _temp_dir) = create_test_store();
        let records = sample_chain(1).to_records();

        store.insert(&records[0]).unwrap();
        store.insert(&records[1]).unwrap();

        let err = store.insert(&records[1]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateIndex { index: 1 }));
        assert_eq!(store.load_all().unwrap().len(), 2);
    }

    #[test]
    fn test_gap_rejected() {
        let (mut store, _temp_dir) = create_test_store();
        let records = sample_chain(2).to_records();

        store.insert(&records[0]).unwrap();
        let err = store.insert(&records[2]).unwrap_err();
        assert!(matches!(
            err,
            StoreError::OutOfSequence {
                index: 2,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_unreadable_lines_are_skipped() {
        let (mut store, temp_dir) = create_test_store();
        let records = sample_chain(1).to_records();
        store.insert(&records[0]).unwrap();

        let path = store.config().blocks_path();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        writeln!(file, "{{not json").unwrap();
        writeln!(file).unwrap();

        let reopened = JsonlBlockStore::open(StoreConfig::new(temp_dir.path())).unwrap();
        assert_eq!(reopened.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_partial_last_line_is_discarded() {
        let (mut store, temp_dir) = create_test_store();
        let records = sample_chain(1).to_records();
        store.insert(&records[0]).unwrap();

        let path = store.config().blocks_path();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "{{\"index\":1,\"timest").unwrap();
        drop(file);

        let mut reopened = JsonlBlockStore::open(StoreConfig::new(temp_dir.path())).unwrap();
        assert_eq!(reopened.load_all().unwrap().len(), 1);
        reopened.insert(&records[1]).unwrap();

        let again = JsonlBlockStore::open(StoreConfig::new(temp_dir.path())).unwrap();
        assert_eq!(again.load_all().unwrap(), records);
    }

    #[test]
    fn test_unterminated_complete_record_is_kept() {
        let (mut store, temp_dir) = create_test_store();
        let records = sample_chain(2).to_records();
        store.insert(&records[0]).unwrap();

        let path = store.config().blocks_path();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        write!(file, "{}", records[1].to_json_line().unwrap()).unwrap();
        drop(file);

        let mut reopened = JsonlBlockStore::open(StoreConfig::new(temp_dir.path())).unwrap();
        assert_eq!(reopened.load_all().unwrap().len(), 2);
        reopened.insert(&records[2]).unwrap();

        let again = JsonlBlockStore::open(StoreConfig::new(temp_dir.path())).unwrap();
        assert_eq!(again.load_all().unwrap(), records);
    }

    #[test]
    fn test_timestamp_survives_byte_for_byte() {
        let (mut store, temp_dir) = create_test_store();
        let mut records = sample_chain(0).to_records();
        records[0].timestamp = "2026-01-01T00:00:00.123Z".to_string();
        store.insert(&records[0]).unwrap();

        let reopened = JsonlBlockStore::open(StoreConfig::new(temp_dir.path())).unwrap();
        assert_eq!(
            reopened.load_all().unwrap()[0].timestamp,
            "2026-01-01T00:00:00.123Z"
        );
    }

    #[test]
    fn test_query_reads_from_mirror() {
        let (mut store, _temp_dir) = create_test_store();
        for record in sample_chain(3).to_records() {
            store.insert(&record).unwrap();
        }

        let page = store.query(&AlertQuery::latest(2)).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].index, 3);
    }
}
