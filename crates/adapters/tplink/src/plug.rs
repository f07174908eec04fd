//! `plug` action and `plug_on` condition.

use async_trait::async_trait;
use serde_json::Value;

use smarthub_app::ports::{ActionProvider, ConditionProvider};
use smarthub_domain::arguments::{Arguments, Combine};
use smarthub_domain::error::ProviderError;
use smarthub_domain::signal::Signal;

use crate::client::TplinkClient;
use crate::command;

/// `plug(command, host, payload=?)`: send one command, return the reply.
#[derive(Debug, Clone)]
pub struct PlugAction {
    client: TplinkClient,
}

impl PlugAction {
    #[must_use]
    pub fn new(client: TplinkClient) -> Self {
        Self { client }
    }
}

/// The command name, the request to send and the target host.
fn plug_request(arguments: &Arguments) -> Result<(&str, String, &str), ProviderError> {
    let name = arguments.str_at(0)?;
    let host = arguments.str_at(1)?;
    let request = command::request(name, arguments.option_str("payload")?)?;
    Ok((name, request, host))
}

#[async_trait]
impl ActionProvider for PlugAction {
    async fn execute(&self, arguments: &Arguments) -> Result<Option<Value>, ProviderError> {
        let (name, request, host) = plug_request(arguments)?;
        let reply = self.client.send(host, &request).await?;
        tracing::info!(host, command = name, "plug command sent");
        Ok(Some(reply))
    }

    fn validate(&self, arguments: &Arguments) -> Result<(), ProviderError> {
        plug_request(arguments).map(|_| ())
    }
}

/// `plug_on(host…, op=?)`: whether the relays are closed.
///
/// A plug that cannot be queried counts as open.
#[derive(Debug, Clone)]
pub struct PlugOn {
    client: TplinkClient,
}

impl PlugOn {
    #[must_use]
    pub fn new(client: TplinkClient) -> Self {
        Self { client }
    }
}

fn hosts(arguments: &Arguments) -> Result<Vec<&str>, ProviderError> {
    let hosts = arguments.strings()?;
    if hosts.is_empty() {
        return Err(ProviderError::InvalidArguments(
            "plug_on needs at least one host".to_string(),
        ));
    }
    Ok(hosts)
}

#[async_trait]
impl ConditionProvider for PlugOn {
    async fn check(&self, arguments: &Arguments) -> Result<Signal, ProviderError> {
        let combine = Combine::from_options(arguments)?;
        let mut answers = Vec::new();
        for host in hosts(arguments)? {
            let on = match self.client.relay_on(host).await {
                Ok(on) => on,
                Err(err) => {
                    tracing::warn!(host, %err, "plug state unavailable");
                    false
                }
            };
            tracing::debug!(host, on, "plug state");
            answers.push(on);
        }
        Ok(Signal::from(combine.fold(answers)))
    }

    fn validate(&self, arguments: &Arguments) -> Result<(), ProviderError> {
        Combine::from_options(arguments)?;
        hosts(arguments).map(|_| ())
    }
}
