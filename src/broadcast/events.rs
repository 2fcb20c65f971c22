//! Event types pushed to subscribed consoles

use serde::{Deserialize, Serialize};

use crate::types::{BlockRecord, ChainStats, ChainStatus};

/// Ledger events delivered to subscribers
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A block was appended and durably stored
    NewAlert {
        block: BlockRecord,
        stats: ChainStats,
        #[serde(rename = "chainStatus")]
        chain_status: ChainStatus,
    },

    /// Current aggregate counts (snapshot)
    ChainStats { stats: ChainStats },

    /// Current integrity report (snapshot)
    ChainStatus {
        #[serde(rename = "chainStatus")]
        chain_status: ChainStatus,
    },
}

impl LedgerEvent {
    /// Wire tag, also used as the SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerEvent::NewAlert { .. } => "new_alert",
            LedgerEvent::ChainStats { .. } => "chain_stats",
            LedgerEvent::ChainStatus { .. } => "chain_status",
        }
    }

    /// The two snapshot events a new subscriber receives
    pub fn snapshot(stats: ChainStats, chain_status: ChainStatus) -> [LedgerEvent; 2] {
        [
            LedgerEvent::ChainStats { stats },
            LedgerEvent::ChainStatus { chain_status },
        ]
    }
}

/// Message wrapper with metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastMessage {
    #[serde(flatten)]
    pub event: LedgerEvent,

    /// Monotonically increasing sequence ID for gap detection
    pub sequence_id: u64,

    /// ISO-8601 instant the message was emitted
    pub emitted_at: String,
}

/// Messages a console may send over the WebSocket
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat
    Ping,
    /// Ask for a fresh stats + status snapshot
    Snapshot,
}

/// Out-of-band notices (`pong`, `error`)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoticeMessage {
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NoticeMessage {
    pub fn pong() -> Self {
        Self {
            msg_type: "pong".to_string(),
            code: None,
            message: None,
        }
    }

    pub fn lagged(missed: u64) -> Self {
        Self {
            msg_type: "error".to_string(),
            code: Some("lagged".to_string()),
            message: Some(format!("Missed {} events, please refresh", missed)),
        }
    }
}
