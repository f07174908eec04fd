//! Subscription — the receiving half of an event-bound rule.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::rule::Rule;
use crate::scheduler::run_guarded;

/// Receives the notifications an event source sends to one rule.
#[derive(Debug)]
pub struct Subscription {
    source: String,
    receiver: mpsc::UnboundedReceiver<()>,
}

impl Subscription {
    #[must_use]
    pub fn new(source: impl Into<String>, receiver: mpsc::UnboundedReceiver<()>) -> Self {
        Self {
            source: source.into(),
            receiver,
        }
    }

    /// Capability name of the event source.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Run `rule` once per notification until cancelled or until the
    /// source drops its sink.
    ///
    /// Cancellation is only observed between runs; a run in progress
    /// completes.
    pub async fn listen(mut self, rule: Arc<Rule>, token: CancellationToken) {
        tracing::debug!(rule = %rule.name(), source = %self.source, "listening for events");
        loop {
            tokio::select! {
                () = token.cancelled() => break,
                notice = self.receiver.recv() => {
                    if notice.is_none() {
                        tracing::debug!(
                            rule = %rule.name(),
                            source = %self.source,
                            "event source closed"
                        );
                        break;
                    }
                    tracing::info!(
                        rule = %rule.name(),
                        source = %self.source,
                        "event invokes evaluation of rule"
                    );
                    run_guarded(&rule).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use smarthub_domain::arguments::Arguments;

    use super::*;
    use crate::operation::Operation;
    use crate::testing::{ManualSource, RecordingAction};

    fn button_rule(source: &ManualSource, log: &Arc<Mutex<Vec<String>>>) -> (Rule, Subscription) {
        let mut rule = Rule::new("lamp button");
        rule.add_operation(Operation::new(
            "plug",
            Arguments::new(),
            Arc::new(RecordingAction::new("plug", Arc::clone(log))),
        ));
        let arguments = Arguments::positional(["ac:63:be:00:11:22"]);
        let subscription = rule.bind_event("dash", source, &arguments).unwrap();
        (rule, subscription)
    }

    #[tokio::test(start_paused = true)]
    async fn should_run_rule_once_per_notification() {
        let source = ManualSource::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let (rule, subscription) = button_rule(&source, &log);
        let token = CancellationToken::new();
        let listener = tokio::spawn(subscription.listen(Arc::new(rule), token.clone()));

        source.fire();
        source.fire();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(log.lock().unwrap().len(), 2);

        source.fire();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(log.lock().unwrap().len(), 3);

        token.cancel();
        listener.await.unwrap();
    }

    #[tokio::test]
    async fn should_stop_when_source_drops_its_sink() {
        let source = ManualSource::default();
        let log = Arc::new(Mutex::new(Vec::new()));
        let (rule, subscription) = button_rule(&source, &log);
        drop(source);

        subscription
            .listen(Arc::new(rule), CancellationToken::new())
            .await;
        assert!(log.lock().unwrap().is_empty());
    }
}
