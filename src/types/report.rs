//! Derived chain views: aggregate statistics and integrity reports

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Severity;

/// Per-severity counters; every level is always present on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(rename = "LOW")]
    pub low: u64,
    #[serde(rename = "MEDIUM")]
    pub medium: u64,
    #[serde(rename = "HIGH")]
    pub high: u64,
    #[serde(rename = "CRITICAL")]
    pub critical: u64,
}

impl SeverityCounts {
    /// Count one block; unrecognized levels are not counted
    pub fn record(&mut self, severity: &Severity) {
        if let Some(slot) = self.slot(severity) {
            *slot += 1;
        }
    }

    pub fn get(&self, severity: &Severity) -> u64 {
        match severity {
            Severity::Low => self.low,
            Severity::Medium => self.medium,
            Severity::High => self.high,
            Severity::Critical => self.critical,
            Severity::Unrecognized(_) => 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.low + self.medium + self.high + self.critical
    }

    fn slot(&mut self, severity: &Severity) -> Option<&mut u64> {
        match severity {
            Severity::Low => Some(&mut self.low),
            Severity::Medium => Some(&mut self.medium),
            Severity::High => Some(&mut self.high),
            Severity::Critical => Some(&mut self.critical),
            Severity::Unrecognized(_) => None,
        }
    }
}

/// Aggregate view over the chain, recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStats {
    /// Number of blocks including genesis
    pub total_blocks: u64,
    pub severity_counts: SeverityCounts,
    /// Counts keyed by alert type name (genesis excluded)
    pub type_counts: BTreeMap<String, u64>,
    pub genesis_timestamp: Option<String>,
    pub latest_timestamp: Option<String>,
}

/// Point-in-time integrity report produced by a full chain scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStatus {
    pub valid: bool,
    pub total_blocks: u64,
    pub errors: Vec<String>,
    /// ISO-8601 instant of the scan
    pub last_verified: String,
}
