//! Transport settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol::PROTOCOL_VERSION;

pub const DEFAULT_PORT: u16 = 59873;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    pub port: u16,
    /// Bounds both the TCP connect and the version handshake.
    pub connect_timeout_ms: u64,
    /// Version announced during the handshake.
    pub protocol_version: u32,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            protocol_version: PROTOCOL_VERSION,
        }
    }
}

impl NetConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
