//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `smarthub.toml` in the working directory, or at the path in
//! `SMARTHUB_CONFIG`. Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use std::time::Duration;

use serde::Deserialize;
use smarthub_adapter_network::NetworkConfig;
use smarthub_adapter_tplink::TplinkConfig;
use smarthub_app::scheduler::DEFAULT_POLL_INTERVAL;
use smarthub_domain::rule::RuleSpec;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Poll loop settings.
    pub scheduler: SchedulerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// TP-Link plug settings.
    pub tplink: TplinkConfig,
    /// Ping and Dash button settings.
    pub network: NetworkConfig,
    /// The rules, in evaluation order.
    pub rules: Vec<RuleSpec>,
}

/// Poll loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Seconds between two passes over the polled rules.
    pub poll_interval_secs: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `smarthub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("SMARTHUB_CONFIG").unwrap_or_else(|_| "smarthub.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SMARTHUB_POLL_INTERVAL") {
            if let Ok(secs) = val.parse() {
                self.scheduler.poll_interval_secs = secs;
            }
        }
        if let Ok(val) = std::env::var("SMARTHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduler.poll_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "poll interval must be non-zero".to_string(),
            ));
        }
        for rule in &self.rules {
            rule.validate()?;
        }
        Ok(())
    }

    /// Time between two passes over the polled rules.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.scheduler.poll_interval_secs)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smarthubd=info,smarthub=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// A rule that can never be built.
    #[error("invalid rule")]
    Rule(#[from] smarthub_domain::error::ConfigError),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
