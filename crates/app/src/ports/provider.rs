//! Provider ports — the condition and action capabilities rules are built from.

use async_trait::async_trait;

use smarthub_domain::arguments::Arguments;
use smarthub_domain::error::ProviderError;
use smarthub_domain::signal::Signal;

use super::EventSource;

/// A named unit answering a boolean-ish question (`"is device X online"`).
///
/// Providers own their timeouts: the engine never bounds a call itself.
#[async_trait]
pub trait ConditionProvider: Send + Sync {
    /// Answer the question for `arguments`.
    ///
    /// Returning [`Signal::Error`] and returning `Err` are treated alike by
    /// the engine: the trigger does not pass.
    async fn check(&self, arguments: &Arguments) -> Result<Signal, ProviderError>;

    /// Reject malformed arguments when the rule is built, so that they
    /// surface as configuration errors rather than failing on every poll.
    ///
    /// The default accepts anything.
    fn validate(&self, _arguments: &Arguments) -> Result<(), ProviderError> {
        Ok(())
    }

    /// The push interface of this provider, if it has one.
    fn as_event_source(&self) -> Option<&dyn EventSource> {
        None
    }
}

/// A named unit performing a side effect (`"turn relay on"`).
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Perform the action. The result, if any, is only logged.
    async fn execute(&self, arguments: &Arguments)
    -> Result<Option<serde_json::Value>, ProviderError>;

    /// See [`ConditionProvider::validate`].
    fn validate(&self, _arguments: &Arguments) -> Result<(), ProviderError> {
        Ok(())
    }
}
