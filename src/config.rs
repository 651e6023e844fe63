//! TOML configuration: the registered networks and the pacing interval.
//!
//! ```toml
//! delay_ms = 500
//!
//! [networks.eth]
//! rpc_url = "https://eth.example.org"
//! chain_id = 1
//! ens_registry = "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e"
//!
//! [networks.bsc]
//! rpc_url = "https://bsc.example.org"
//! chain_id = 56
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_delay_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub chain_id: u64,
    /// Name-service registry address. Present only on networks that support
    /// name resolution.
    #[serde(default)]
    pub ens_registry: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Pause between consecutive submissions, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
