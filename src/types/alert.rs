//! Alert classification: alert types and severity levels

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category tag carried by every block
///
/// The well-known categories map to dedicated variants. Correlation engines
/// may emit their own upper-snake-case categories, which are kept verbatim
/// in [`AlertType::Derived`].
///
/// Parsing with [`FromStr`] is strict. Deserializing is not: stored text is
/// kept as-is so an altered record still loads and fails its hash check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AlertType {
    Genesis,
    Phishing,
    Anomaly,
    Intrusion,
    Malware,
    Ddos,
    DataBreach,
    UnauthorizedAccess,
    FirewallLockdown,
    CorrelatedThreat,
    /// Any other correlation-derived category
    Derived(String),
}

impl AlertType {
    /// Categories accepted without going through the derived-type rule
    pub const KNOWN: [AlertType; 10] = [
        AlertType::Genesis,
        AlertType::Phishing,
        AlertType::Anomaly,
        AlertType::Intrusion,
        AlertType::Malware,
        AlertType::Ddos,
        AlertType::DataBreach,
        AlertType::UnauthorizedAccess,
        AlertType::FirewallLockdown,
        AlertType::CorrelatedThreat,
    ];

    /// Wire name of the category
    pub fn as_str(&self) -> &str {
        match self {
            AlertType::Genesis => "GENESIS",
            AlertType::Phishing => "PHISHING",
            AlertType::Anomaly => "ANOMALY",
            AlertType::Intrusion => "INTRUSION",
            AlertType::Malware => "MALWARE",
            AlertType::Ddos => "DDOS",
            AlertType::DataBreach => "DATA_BREACH",
            AlertType::UnauthorizedAccess => "UNAUTHORIZED_ACCESS",
            AlertType::FirewallLockdown => "FIREWALL_LOCKDOWN",
            AlertType::CorrelatedThreat => "CORRELATED_THREAT",
            AlertType::Derived(name) => name,
        }
    }

    pub fn is_genesis(&self) -> bool {
        matches!(self, AlertType::Genesis)
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a usable alert category or severity
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAlertError {
    #[error("invalid alert type '{0}': expected an UPPER_SNAKE_CASE identifier")]
    AlertType(String),
    #[error("invalid severity '{0}': expected one of LOW, MEDIUM, HIGH, CRITICAL")]
    Severity(String),
}

/// Upper-snake-case identifier: `[A-Z][A-Z0-9_]*`
fn is_category_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

impl FromStr for AlertType {
    type Err = ParseAlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(known) = Self::KNOWN.iter().find(|t| t.as_str() == s) {
            return Ok(known.clone());
        }
        if is_category_name(s) {
            Ok(AlertType::Derived(s.to_string()))
        } else {
            Err(ParseAlertError::AlertType(s.to_string()))
        }
    }
}

impl From<String> for AlertType {
    fn from(value: String) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == value)
            .unwrap_or_else(|| AlertType::Derived(value))
    }
}

impl From<AlertType> for String {
    fn from(value: AlertType) -> Self {
        match value {
            AlertType::Derived(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

/// Alert severity
///
/// Like [`AlertType`], deserializing keeps unknown stored text instead of
/// failing; ingress goes through the strict [`FromStr`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    /// Stored text that is not a known level
    Unrecognized(String),
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
            Severity::Unrecognized(text) => text,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ParseAlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParseAlertError::Severity(s.to_string()))
    }
}

impl From<String> for Severity {
    fn from(value: String) -> Self {
        value
            .parse()
            .unwrap_or(Severity::Unrecognized(value))
    }
}

impl From<Severity> for String {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Unrecognized(text) => text,
            other => other.as_str().to_string(),
        }
    }
}
