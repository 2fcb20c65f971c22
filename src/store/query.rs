//! Alert queries over stored records

use serde::Serialize;

use crate::types::{AlertType, BlockRecord, Severity};

/// Filter and pagination for stored alerts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertQuery {
    pub severity: Option<Severity>,
    pub alert_type: Option<AlertType>,
    pub include_genesis: bool,
    /// 1-based page number
    pub page: usize,
    pub limit: usize,
}

impl Default for AlertQuery {
    fn default() -> Self {
        Self {
            severity: None,
            alert_type: None,
            include_genesis: true,
            page: 1,
            limit: 50,
        }
    }
}

impl AlertQuery {
    /// Newest `limit` alerts, genesis excluded
    pub fn latest(limit: usize) -> Self {
        Self {
            include_genesis: false,
            limit,
            ..Default::default()
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_alert_type(mut self, alert_type: AlertType) -> Self {
        self.alert_type = Some(alert_type);
        self
    }

    pub fn with_page(mut self, page: usize, limit: usize) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    pub fn matches(&self, record: &BlockRecord) -> bool {
        if !self.include_genesis && record.alert_type.is_genesis() {
            return false;
        }
        if self.severity.as_ref().is_some_and(|s| s != &record.severity) {
            return false;
        }
        if let Some(ref alert_type) = self.alert_type {
            if alert_type != &record.alert_type {
                return false;
            }
        }
        true
    }

    /// Run the query over records stored in ascending index order
    pub fn apply(&self, records: &[BlockRecord]) -> AlertPage {
        let page = self.page.max(1);
        let skip = (page - 1).saturating_mul(self.limit);

        let matching: Vec<&BlockRecord> = records.iter().rev().filter(|r| self.matches(r)).collect();
        let total = matching.len();
        let blocks = matching
            .into_iter()
            .skip(skip)
            .take(self.limit)
            .cloned()
            .collect();

        AlertPage {
            blocks,
            total,
            page,
            pages: total.div_ceil(self.limit.max(1)),
        }
    }
}

/// One page of query results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPage {
    pub blocks: Vec<BlockRecord>,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
}
