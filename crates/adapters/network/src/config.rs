//! Network integration configuration.

use std::time::Duration;

use serde::Deserialize;

/// Configuration for `device_online` and the `dash` listener.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// UDP address the DHCP listener binds to.
    pub dash_bind: String,
    /// Sightings of the same button closer than this are ignored, in milliseconds.
    pub flood_interval_ms: u64,
    /// Echo requests sent per host.
    pub ping_count: u32,
    /// How long `ping` waits for each reply, in seconds.
    pub ping_timeout_secs: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            dash_bind: "0.0.0.0:67".to_string(),
            flood_interval_ms: 2000,
            ping_count: 4,
            ping_timeout_secs: 1,
        }
    }
}

impl NetworkConfig {
    #[must_use]
    pub fn flood_interval(&self) -> Duration {
        Duration::from_millis(self.flood_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_have_sensible_defaults() {
        let config = NetworkConfig::default();
        assert_eq!(config.dash_bind, "0.0.0.0:67");
        assert_eq!(config.flood_interval(), Duration::from_secs(2));
        assert_eq!(config.ping_count, 4);
        assert_eq!(config.ping_timeout_secs, 1);
    }

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            dash_bind = "192.168.1.2:67"
            flood_interval_ms = 500
            ping_count = 2
        "#;
        let config: NetworkConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.dash_bind, "192.168.1.2:67");
        assert_eq!(config.flood_interval(), Duration::from_millis(500));
        assert_eq!(config.ping_count, 2);
        assert_eq!(config.ping_timeout_secs, 1);
    }
}
