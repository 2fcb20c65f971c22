//! Hash-chain primitives: canonical serialization and SHA-256 digest.
//!
//! Hash input is compact JSON of an object whose keys appear in exactly
//! this order:
//!
//!   `index, timestamp, alertType, severity, payload, previousHash, nonce`
//!
//! Keys inside `payload` are emitted in sorted order at every nesting level,
//! so the same logical payload always produces the same bytes no matter how
//! it was built or which order its keys arrived in.

use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::block::Block;

/// `previousHash` of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashInput<'a> {
    index: u64,
    timestamp: &'a str,
    alert_type: &'a str,
    severity: &'a str,
    payload: Value,
    previous_hash: &'a str,
    nonce: u64,
}

/// Canonical byte serialization of a block's hashed fields.
///
/// # Panics
///
/// Panics if the input cannot be serialized to JSON, which cannot happen:
/// every field is a string, an integer or an already-valid JSON value.
pub fn canonical_bytes(block: &Block) -> Vec<u8> {
    let input = HashInput {
        index: block.index(),
        timestamp: block.timestamp(),
        alert_type: block.alert_type().as_str(),
        severity: block.severity().as_str(),
        payload: canonicalize(block.payload()),
        previous_hash: block.previous_hash(),
        nonce: block.nonce(),
    };
    serde_json::to_vec(&input).expect("hash input must always be serializable to JSON")
}

/// Lowercase 64-character hex SHA-256 of [`canonical_bytes`]
pub fn compute_hash(block: &Block) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_bytes(block));
    hex::encode(hasher.finalize())
}

/// Rebuild every object with its keys inserted in sorted order
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
