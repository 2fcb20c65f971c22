//! Firewall lockdown requests

use std::net::IpAddr;

use serde::Deserialize;
use serde_json::{json, Value};

use super::{LedgerError, LedgerResult};

const DEFAULT_REASON: &str = "Suspicious activity detected";
const MITIGATION: &str = "IMMEDIATE_IP_BLACKLIST";
const ENFORCED_BY: &str = "ALERT-LEDGER-DEFENSE";

/// Request to blacklist an address, recorded as a `FIREWALL_LOCKDOWN` block
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockdownRequest {
    pub target_ip: Option<String>,
    /// Alert that triggered the lockdown, passed through as-is
    #[serde(default)]
    pub alert_id: Option<Value>,
    pub reason: Option<String>,
}

impl LockdownRequest {
    pub fn new(target_ip: impl Into<String>) -> Self {
        Self {
            target_ip: Some(target_ip.into()),
            ..Default::default()
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_alert_id(mut self, alert_id: Value) -> Self {
        self.alert_id = Some(alert_id);
        self
    }

    /// Validate the request and build the block payload
    pub fn into_payload(self) -> LedgerResult<Value> {
        let target_ip = self
            .target_ip
            .map(|ip| ip.trim().to_string())
            .filter(|ip| !ip.is_empty())
            .ok_or_else(|| {
                LedgerError::InvalidRequest("Target IP is required for lockdown.".to_string())
            })?;

        let target_ip: IpAddr = target_ip.parse().map_err(|_| {
            LedgerError::InvalidRequest(format!("'{}' is not a valid IP address", target_ip))
        })?;

        let reason = self
            .reason
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REASON.to_string());

        Ok(json!({
            "targetIp": target_ip.to_string(),
            "alertId": self.alert_id.unwrap_or(Value::Null),
            "reason": reason,
            "mitigation": MITIGATION,
            "enforcedBy": ENFORCED_BY,
        }))
    }
}
