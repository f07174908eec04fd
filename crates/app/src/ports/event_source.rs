//! Event source port — providers that push instead of being polled.
//!
//! A rule bound to an event source hands the source an [`EventSink`]; the
//! source decides when to call [`EventSink::notify`]. The rule is then run
//! by its own listener task. The sink is a message channel, not a
//! reference into the rule. Every notification yields one run.

use std::sync::Arc;

use tokio::sync::mpsc;

use smarthub_domain::arguments::Arguments;
use smarthub_domain::error::ProviderError;

/// Sending half of a rule subscription.
#[derive(Debug, Clone)]
pub struct EventSink {
    rule: Arc<str>,
    sender: mpsc::UnboundedSender<()>,
}

impl EventSink {
    /// Create a sink for `rule` together with the receiving half.
    #[must_use]
    pub fn channel(rule: &str) -> (Self, mpsc::UnboundedReceiver<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                rule: Arc::from(rule),
                sender,
            },
            receiver,
        )
    }

    /// Name of the rule this sink notifies.
    #[must_use]
    pub fn rule(&self) -> &str {
        &self.rule
    }

    /// Ask for one run of the rule.
    ///
    /// Never blocks. Notifications queue up while a run is in progress.
    /// Returns `false` when the rule is no longer listening.
    pub fn notify(&self) -> bool {
        if self.sender.send(()).is_err() {
            tracing::debug!(rule = %self.rule, "rule stopped listening, notification dropped");
            return false;
        }
        true
    }

    /// Whether the subscribed rule stopped listening.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The push interface of an event-capable condition provider.
pub trait EventSource: Send + Sync {
    /// Register `sink` to be notified whenever the source fires for
    /// `arguments`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidArguments`] when `arguments` do not
    /// describe anything this source can watch.
    fn register(&self, sink: EventSink, arguments: &Arguments) -> Result<(), ProviderError>;
}
