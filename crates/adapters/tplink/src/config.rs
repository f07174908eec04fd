//! TP-Link integration configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for the TP-Link plugs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TplinkConfig {
    /// TCP port the plugs listen on.
    pub port: u16,
    /// Budget for one request, connect to reply, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for TplinkConfig {
    fn default() -> Self {
        Self {
            port: 9999,
            timeout_ms: 5000,
        }
    }
}

impl TplinkConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
