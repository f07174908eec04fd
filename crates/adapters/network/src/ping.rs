//! `device_online(host…, op=?)` — whether hosts answer every ping.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use smarthub_app::ports::ConditionProvider;
use smarthub_domain::arguments::{Arguments, Combine};
use smarthub_domain::error::ProviderError;
use smarthub_domain::signal::Signal;

use crate::config::NetworkConfig;
use crate::error::NetworkError;

/// Answers whether one host is reachable.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn online(&self, host: &str) -> Result<bool, NetworkError>;
}

/// Runs the system `ping`.
#[derive(Debug, Clone)]
pub struct SystemPing {
    count: u32,
    timeout_secs: u32,
}

impl SystemPing {
    #[must_use]
    pub fn new(config: &NetworkConfig) -> Self {
        Self {
            count: config.ping_count.max(1),
            timeout_secs: config.ping_timeout_secs.max(1),
        }
    }
}

#[async_trait]
impl Probe for SystemPing {
    async fn online(&self, host: &str) -> Result<bool, NetworkError> {
        let output = Command::new("ping")
            .arg("-c")
            .arg(self.count.to_string())
            .arg("-W")
            .arg(self.timeout_secs.to_string())
            .arg(host)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(NetworkError::Ping)?;
        let report = String::from_utf8_lossy(&output.stdout);
        Ok(output.status.success() && lost_nothing(&report))
    }
}

/// Whether a `ping` summary reports zero packet loss.
///
/// Reads the figure in front of `% packet loss`, so `100% packet loss`
/// and `10% packet loss` are not mistaken for `0%`.
#[must_use]
pub fn lost_nothing(report: &str) -> bool {
    report.lines().any(|line| {
        line.split_once("% packet loss").is_some_and(|(before, _)| {
            let figure = before
                .rsplit(|c: char| c == ',' || c.is_whitespace())
                .next()
                .unwrap_or_default();
            !figure.is_empty() && figure.chars().all(|c| c == '0' || c == '.')
        })
    })
}

fn hosts(arguments: &Arguments) -> Result<Vec<&str>, ProviderError> {
    let hosts = arguments.strings()?;
    if hosts.is_empty() {
        return Err(ProviderError::InvalidArguments(
            "device_online needs at least one host".to_string(),
        ));
    }
    if let Some(host) = hosts.iter().find(|host| host.is_empty() || host.starts_with('-')) {
        return Err(NetworkError::InvalidHost((*host).to_string()).into());
    }
    Ok(hosts)
}

pub struct DeviceOnline {
    probe: Arc<dyn Probe>,
}

impl DeviceOnline {
    #[must_use]
    pub fn new(probe: Arc<dyn Probe>) -> Self {
        Self { probe }
    }
}

#[async_trait]
impl ConditionProvider for DeviceOnline {
    async fn check(&self, arguments: &Arguments) -> Result<Signal, ProviderError> {
        let combine = Combine::from_options(arguments)?;
        let mut answers = Vec::new();
        for host in hosts(arguments)? {
            let online = match self.probe.online(host).await {
                Ok(online) => online,
                Err(err) => {
                    tracing::warn!(host, %err, "reachability probe failed");
                    false
                }
            };
            tracing::debug!(host, online, "device probed");
            answers.push(online);
        }
        Ok(Signal::from(combine.fold(answers)))
    }

    fn validate(&self, arguments: &Arguments) -> Result<(), ProviderError> {
        Combine::from_options(arguments)?;
        hosts(arguments).map(|_| ())
    }
}
