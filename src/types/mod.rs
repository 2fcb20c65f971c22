//! Data types for the alert ledger
//!
//! This module contains the wire and storage shapes shared by the chain,
//! the block store and the API layer.

mod alert;
mod record;
mod report;

pub use alert::{AlertType, ParseAlertError, Severity};
pub use record::BlockRecord;
pub use report::{ChainStats, ChainStatus, SeverityCounts};
