//! Real-time fan-out of ledger events
//!
//! Every successful append is published as a `new_alert` event carrying the
//! new block and freshly computed stats and integrity report. Subscribers
//! joining later get a `chain_stats` + `chain_status` snapshot instead of
//! history.
//!
//! ## Delivery
//! - Best-effort: a bounded `tokio::sync::broadcast` channel
//! - Lagging subscribers skip ahead and are told how many events they missed
//! - Sequence IDs let clients detect gaps

mod broadcaster;
mod events;

pub use broadcaster::EventBroadcaster;
pub use events::{BroadcastMessage, ClientMessage, LedgerEvent, NoticeMessage};
