//! The ledger service: bootstrap, serialized append, reads

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::{LedgerError, LedgerResult, LockdownRequest};
use crate::broadcast::{EventBroadcaster, LedgerEvent};
use crate::chain::Chain;
use crate::store::{AlertPage, AlertQuery, BlockStore, StoreStats};
use crate::types::{AlertType, BlockRecord, ChainStats, ChainStatus, Severity};

/// Service health summary
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub service: &'static str,
    /// `operational`, or `degraded` once memory and storage have diverged
    pub status: &'static str,
    pub blockchain: ChainHealth,
    pub storage: StoreStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChainHealth {
    pub blocks: u64,
    pub valid: bool,
}

/// Single authoritative writer of the alert chain
pub struct LedgerService {
    chain: RwLock<Chain>,
    /// Doubles as the append lock: held across append, persist and broadcast
    store: Mutex<Box<dyn BlockStore>>,
    broadcaster: Arc<EventBroadcaster>,
    diverged: AtomicBool,
}

impl LedgerService {
    /// Restore the chain from storage, or seed and persist a genesis block
    ///
    /// A restored chain that fails validation is logged loudly but still
    /// served, so operators can inspect it.
    pub fn bootstrap(
        mut store: Box<dyn BlockStore>,
        broadcaster: Arc<EventBroadcaster>,
    ) -> LedgerResult<Self> {
        let records = store.load_all()?;
        let mut chain = Chain::new();

        if records.is_empty() {
            let genesis = chain.create_genesis_block()?.to_record();
            store.insert(&genesis)?;
            info!(hash = %genesis.hash, "genesis block created");
        } else {
            chain.load_from(records);
            info!(blocks = chain.len(), "loaded blocks from storage");

            let status = chain.validate();
            if !status.valid {
                for violation in &status.errors {
                    warn!(%violation, "stored chain failed integrity check");
                }
                warn!(
                    errors = status.errors.len(),
                    "ledger loaded with integrity violations; stored blocks may have been tampered with"
                );
            }
        }

        Ok(Self {
            chain: RwLock::new(chain),
            store: Mutex::new(store),
            broadcaster,
            diverged: AtomicBool::new(false),
        })
    }

    /// Append, persist and broadcast one alert
    ///
    /// The block is broadcast only after it is durable. If persisting fails
    /// the service refuses further appends until it is restarted.
    pub fn record_alert(
        &self,
        alert_type: AlertType,
        severity: Severity,
        payload: Value,
    ) -> LedgerResult<BlockRecord> {
        let mut store = self.store.lock();

        if self.is_diverged() {
            return Err(LedgerError::Diverged);
        }

        let record = {
            let mut chain = self.chain.write();
            chain.append(alert_type, severity, payload)?.to_record()
        };

        if let Err(source) = store.insert(&record) {
            self.diverged.store(true, Ordering::SeqCst);
            error!(
                index = record.index,
                error = %source,
                "failed to persist block; in-memory chain is ahead of storage, restart required"
            );
            return Err(LedgerError::Persistence {
                index: record.index,
                source,
            });
        }

        let (stats, chain_status) = self.snapshot();
        self.broadcaster.publish(LedgerEvent::NewAlert {
            block: record.clone(),
            stats,
            chain_status,
        });

        info!(
            index = record.index,
            alert_type = %record.alert_type,
            severity = %record.severity,
            "alert recorded"
        );

        Ok(record)
    }

    /// Record a `FIREWALL_LOCKDOWN` block for the requested address
    pub fn engage_lockdown(&self, request: LockdownRequest) -> LedgerResult<BlockRecord> {
        let payload = request.into_payload()?;
        let record = self.record_alert(AlertType::FirewallLockdown, Severity::Critical, payload)?;
        warn!(
            index = record.index,
            target_ip = %record.payload["targetIp"],
            "firewall lockdown engaged"
        );
        Ok(record)
    }

    pub fn stats(&self) -> ChainStats {
        self.chain.read().stats()
    }

    pub fn validate(&self) -> ChainStatus {
        self.chain.read().validate()
    }

    /// Stats and integrity report taken under one read lock
    pub fn snapshot(&self) -> (ChainStats, ChainStatus) {
        let chain = self.chain.read();
        (chain.stats(), chain.validate())
    }

    pub fn latest_block(&self) -> Option<BlockRecord> {
        self.chain.read().latest_block().map(|b| b.to_record())
    }

    pub fn block_count(&self) -> usize {
        self.chain.read().len()
    }

    /// Query the durable record
    pub fn query(&self, query: &AlertQuery) -> LedgerResult<AlertPage> {
        Ok(self.store.lock().query(query)?)
    }

    pub fn health(&self) -> HealthReport {
        let (blocks, valid) = {
            let chain = self.chain.read();
            (chain.len() as u64, chain.validate().valid)
        };
        let storage = self.store.lock().stats();

        HealthReport {
            service: "alert-service",
            status: if self.is_diverged() {
                "degraded"
            } else {
                "operational"
            },
            blockchain: ChainHealth { blocks, valid },
            storage,
        }
    }

    pub fn is_diverged(&self) -> bool {
        self.diverged.load(Ordering::SeqCst)
    }

    pub fn broadcaster(&self) -> &Arc<EventBroadcaster> {
        &self.broadcaster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryBlockStore, StoreError, StoreResult};
    use serde_json::json;

    /// Accepts the first `capacity` inserts, then fails every write
    struct FlakyStore {
        inner: MemoryBlockStore,
        capacity: usize,
    }

    impl BlockStore for FlakyStore {
        fn load_all(&self) -> StoreResult<Vec<BlockRecord>> {
            self.inner.load_all()
        }

        fn insert(&mut self, record: &BlockRecord) -> StoreResult<()> {
            if self.inner.stats().records >= self.capacity {
                return Err(StoreError::Io(std::io::Error::other("disk full")));
            }
            self.inner.insert(record)
        }

        fn query(&self, query: &AlertQuery) -> StoreResult<AlertPage> {
            self.inner.query(query)
        }

        fn stats(&self) -> StoreStats {
            self.inner.stats()
        }
    }

    fn memory_service() -> LedgerService {
        LedgerService::bootstrap(
            Box::new(MemoryBlockStore::new()),
            Arc::new(EventBroadcaster::new(64)),
        )
        .unwrap()
    }

    #[test]
    fn test_bootstrap_seeds_and_persists_genesis() {
        let service = memory_service();
        assert_eq!(service.block_count(), 1);

        let stored = service.query(&AlertQuery::default()).unwrap();
        assert_eq!(stored.total, 1);
        assert!(stored.blocks[0].alert_type.is_genesis());
    }

    #[test]
    fn test_bootstrap_restores_existing_chain() {
        let first = memory_service();
        first
            .record_alert(AlertType::Malware, Severity::High, json!({"host": "ws-12"}))
            .unwrap();
        let records = first.query(&AlertQuery::default().with_page(1, 100)).unwrap().blocks;

        let restored = LedgerService::bootstrap(
            Box::new(MemoryBlockStore::with_records(records)),
            Arc::new(EventBroadcaster::new(8)),
        )
        .unwrap();

        assert_eq!(restored.block_count(), 2);
        assert_eq!(restored.latest_block(), first.latest_block());
        assert!(restored.validate().valid);
    }

    #[test]
    fn test_bootstrap_with_tampered_storage_still_starts() {
        let first = memory_service();
        first
            .record_alert(AlertType::Phishing, Severity::Low, json!({"to": "ceo"}))
            .unwrap();
        let mut records = first.query(&AlertQuery::default()).unwrap().blocks;
        records.reverse();
        records[1].payload = json!({"to": "nobody"});

        let restored = LedgerService::bootstrap(
            Box::new(MemoryBlockStore::with_records(records)),
            Arc::new(EventBroadcaster::new(8)),
        )
        .unwrap();

        let status = restored.validate();
        assert!(!status.valid);
        assert_eq!(status.errors, vec!["Block 1: Hash mismatch (tampering detected)"]);
    }

    #[tokio::test]
    async fn test_record_alert_broadcasts_after_persist() {
        let service = memory_service();
        let mut rx = service.broadcaster().subscribe();

        let record = service
            .record_alert(AlertType::Intrusion, Severity::Critical, json!({"port": 22}))
            .unwrap();

        let msg = rx.recv().await.unwrap();
        match msg.event {
            LedgerEvent::NewAlert {
                block,
                stats,
                chain_status,
            } => {
                assert_eq!(block, record);
                assert_eq!(stats.total_blocks, 2);
                assert_eq!(stats.severity_counts.critical, 1);
                assert!(chain_status.valid);
            }
            other => panic!("unexpected event {:?}", other.kind()),
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_is_not_broadcast_and_diverges() {
        let service = LedgerService::bootstrap(
            Box::new(FlakyStore {
                inner: MemoryBlockStore::new(),
                capacity: 2,
            }),
            Arc::new(EventBroadcaster::new(8)),
        )
        .unwrap();
        let mut rx = service.broadcaster().subscribe();

        service
            .record_alert(AlertType::Anomaly, Severity::Low, json!({}))
            .unwrap();
        assert!(rx.recv().await.is_ok());

        let err = service
            .record_alert(AlertType::Anomaly, Severity::Low, json!({}))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Persistence { index: 2, .. }));
        assert!(service.is_diverged());
        assert!(rx.try_recv().is_err());
        assert_eq!(service.health().status, "degraded");

        let err = service
            .record_alert(AlertType::Anomaly, Severity::Low, json!({}))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Diverged));
        assert_eq!(service.block_count(), 3);
    }

    #[test]
    fn test_engage_lockdown() {
        let service = memory_service();
        let record = service
            .engage_lockdown(LockdownRequest::new("203.0.113.9"))
            .unwrap();

        assert_eq!(record.alert_type, AlertType::FirewallLockdown);
        assert_eq!(record.severity, Severity::Critical);
        assert_eq!(record.payload["targetIp"], "203.0.113.9");
    }

    #[test]
    fn test_invalid_lockdown_leaves_chain_untouched() {
        let service = memory_service();
        let err = service
            .engage_lockdown(LockdownRequest::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRequest(_)));
        assert_eq!(service.block_count(), 1);
    }

    #[test]
    fn test_health() {
        let service = memory_service();
        let health = service.health();
        assert_eq!(health.status, "operational");
        assert_eq!(health.blockchain.blocks, 1);
        assert!(health.blockchain.valid);
        assert_eq!(health.storage.records, 1);
    }
}
