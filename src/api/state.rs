//! Shared application state

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::broadcast::{BroadcastMessage, LedgerEvent};
use crate::service::LedgerService;

/// State shared by every handler
pub struct AppState {
    pub ledger: Arc<LedgerService>,
}

impl AppState {
    pub fn new(ledger: Arc<LedgerService>) -> Self {
        Self { ledger }
    }

    /// Subscribe to live ledger events
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastMessage> {
        self.ledger.broadcaster().subscribe()
    }

    /// Current stats and integrity report, addressed to one subscriber
    ///
    /// Subscribe before calling this so no append falls between the
    /// snapshot and the live feed.
    pub fn snapshot_messages(&self) -> Vec<BroadcastMessage> {
        let (stats, chain_status) = self.ledger.snapshot();
        let broadcaster = self.ledger.broadcaster();
        LedgerEvent::snapshot(stats, chain_status)
            .into_iter()
            .map(|event| broadcaster.direct(event))
            .collect()
    }
}
