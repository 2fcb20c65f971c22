//! Persisted block record
//!
//! `BlockRecord` is the shape every block takes on disk and on the wire.
//! It carries all eight block fields, including the stored `hash`, so a
//! record can be reloaded without recomputing anything.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{AlertType, Severity};

/// One block as stored by the persistence layer, keyed by `index`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    pub index: u64,
    /// ISO-8601 creation instant, kept byte-for-byte
    pub timestamp: String,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub payload: Value,
    pub previous_hash: String,
    #[serde(default)]
    pub nonce: u64,
    pub hash: String,
}

impl BlockRecord {
    /// Serialize record to JSON string (for JSONL)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize record from JSON string
    pub fn from_json_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_wire_names() {
        let record = BlockRecord {
            index: 3,
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            alert_type: AlertType::UnauthorizedAccess,
            severity: Severity::High,
            payload: json!({"user": "mallory"}),
            previous_hash: "ab".repeat(32),
            nonce: 0,
            hash: "cd".repeat(32),
        };

        let line = record.to_json_line().unwrap();
        assert!(line.contains("\"alertType\":\"UNAUTHORIZED_ACCESS\""));
        assert!(line.contains("\"previousHash\""));
        assert!(line.contains("\"severity\":\"HIGH\""));

        let parsed = BlockRecord::from_json_line(&line).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_missing_nonce_defaults_to_zero() {
        let line = r#"{"index":1,"timestamp":"2026-01-01T00:00:00.000Z","alertType":"MALWARE","severity":"LOW","payload":{},"previousHash":"0","hash":"ff"}"#;
        let parsed = BlockRecord::from_json_line(line).unwrap();
        assert_eq!(parsed.nonce, 0);
        assert_eq!(parsed.alert_type, AlertType::Malware);
    }
}
