//! Runtime configuration
//!
//! Read from environment variables at startup:
//!
//! | Variable                   | Default   |
//! |----------------------------|-----------|
//! | `ALERT_HOST`               | `0.0.0.0` |
//! | `ALERT_PORT`               | `4002`    |
//! | `ALERT_DATA_DIR`           | `data`    |
//! | `ALERT_STORE`              | `file`    |
//! | `ALERT_BROADCAST_CAPACITY` | `1024`    |
//!
//! A relative `ALERT_DATA_DIR` is resolved against the current directory.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::store::{BlockStore, JsonlBlockStore, MemoryBlockStore, StoreConfig, StoreResult};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where blocks are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// `<data_dir>/blocks.jsonl`
    #[default]
    File,
    /// Volatile, lost on exit
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(StoreBackend::File),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}', expected file or memory", other)),
        }
    }
}

/// Alert ledger server configuration
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub store: StoreBackend,
    /// Messages a subscriber may fall behind before it starts missing events
    pub broadcast_capacity: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4002,
            data_dir: PathBuf::from("data"),
            store: StoreBackend::File,
            broadcast_capacity: 1024,
        }
    }
}

impl LedgerConfig {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (testable without touching
    /// the process environment)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("ALERT_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("ALERT_PORT") {
            config.port = parse_value("ALERT_PORT", port)?;
        }
        if let Some(dir) = lookup("ALERT_DATA_DIR") {
            config.data_dir = resolve_path(&dir);
        }
        if let Some(store) = lookup("ALERT_STORE") {
            config.store = parse_value("ALERT_STORE", store)?;
        }
        if let Some(capacity) = lookup("ALERT_BROADCAST_CAPACITY") {
            config.broadcast_capacity = parse_value("ALERT_BROADCAST_CAPACITY", capacity)?;
        }

        Ok(config)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_data_dir<P: AsRef<Path>>(mut self, data_dir: P) -> Self {
        self.data_dir = data_dir.as_ref().to_path_buf();
        self
    }

    pub fn with_store(mut self, store: StoreBackend) -> Self {
        self.store = store;
        self
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open the configured block store
    pub fn open_store(&self) -> StoreResult<Box<dyn BlockStore>> {
        let store: Box<dyn BlockStore> = match self.store {
            StoreBackend::File => {
                Box::new(JsonlBlockStore::open(StoreConfig::new(&self.data_dir))?)
            }
            StoreBackend::Memory => Box::new(MemoryBlockStore::new()),
        };
        Ok(store)
    }
}

fn parse_value<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key,
        reason: e.to_string(),
        value,
    })
}

fn resolve_path(path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}
