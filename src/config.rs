//! Server configuration loaded from TOML.
//!
//! ```toml
//! addr = "0.0.0.0:8080"
//! shutdown_grace_secs = 25
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

/// Settings for [`Server`](crate::Server).
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind. Defaults to `0.0.0.0:3000`.
    pub addr: SocketAddr,

    /// Upper bound on the drain phase after a shutdown signal. Connections
    /// still open when it elapses are aborted. Unset means wait for all of
    /// them.
    pub shutdown_grace_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000)),
            shutdown_grace_secs: None,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn shutdown_grace(&self) -> Option<Duration> {
        self.shutdown_grace_secs.map(Duration::from_secs)
    }
}
