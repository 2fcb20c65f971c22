//! Ledger event broadcaster
//!
//! An explicitly constructed publisher owned by the ledger service. Publishing
//! never blocks and never fails: with no subscribers the message is simply
//! dropped.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::trace;

use super::events::{BroadcastMessage, LedgerEvent};
use crate::utils::now_iso8601;

/// Fan-out publisher for ledger events
pub struct EventBroadcaster {
    tx: broadcast::Sender<BroadcastMessage>,
    sequence_counter: AtomicU64,
}

impl EventBroadcaster {
    /// Create a new broadcaster with the given capacity
    ///
    /// Subscribers more than `capacity` messages behind miss the oldest ones.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sequence_counter: AtomicU64::new(0),
        }
    }

    /// Publish an event to every current subscriber
    ///
    /// Returns the sequence ID assigned to the message. IDs start at 1.
    pub fn publish(&self, event: LedgerEvent) -> u64 {
        let seq = self.sequence_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let kind = event.kind();
        let msg = BroadcastMessage {
            event,
            sequence_id: seq,
            emitted_at: now_iso8601(),
        };
        // Err just means no receivers are connected
        let delivered = self.tx.send(msg).unwrap_or(0);
        trace!(sequence_id = seq, kind, subscribers = delivered, "published ledger event");
        seq
    }

    /// Wrap an event for a single subscriber without consuming a sequence ID
    ///
    /// The message carries the last published ID, so the next live event is
    /// exactly one ahead of it.
    pub fn direct(&self, event: LedgerEvent) -> BroadcastMessage {
        BroadcastMessage {
            event,
            sequence_id: self.current_sequence_id(),
            emitted_at: now_iso8601(),
        }
    }

    /// ID of the last published message, 0 before the first
    pub fn current_sequence_id(&self) -> u64 {
        self.sequence_counter.load(Ordering::SeqCst)
    }

    /// Subscribe to receive published events
    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastMessage> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(1024)
    }
}
