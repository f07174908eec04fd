//! Scheduler — polls every rule that is not event-bound, then sleeps.
//!
//! One control path drives the poll loop: passes never overlap and rules
//! are visited in configuration order. Event-bound rules run from their
//! own listener tasks, concurrently with the loop. Cancelling the token
//! stops the loop between rule runs or during the inter-tick sleep.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::FutureExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::invoke::panic_message;
use crate::rule::{Rule, RuleOutcome};
use crate::rule_set::RuleSet;

/// Poll interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Owns the rule set and runs it until cancelled.
#[derive(Debug)]
pub struct Scheduler {
    rules: RuleSet,
    poll_interval: Duration,
}

impl Scheduler {
    #[must_use]
    pub fn new(rules: RuleSet, poll_interval: Duration) -> Self {
        Self {
            rules,
            poll_interval,
        }
    }

    /// Run every polled rule once, in order. Returns how many were run.
    ///
    /// Stops early, between two rules, when `token` is cancelled.
    pub async fn run_pass(&self, token: &CancellationToken) -> usize {
        let mut visited = 0;
        for rule in self.rules.polled() {
            if token.is_cancelled() {
                break;
            }
            run_guarded(rule).await;
            visited += 1;
        }
        visited
    }

    /// Start the event listeners and poll until `token` is cancelled.
    ///
    /// Cancellation is a clean shutdown: this returns once the loop and
    /// every listener have stopped.
    pub async fn run(mut self, token: CancellationToken) {
        let mut listeners = JoinSet::new();
        for (rule, subscription) in self.rules.take_subscriptions() {
            listeners.spawn(subscription.listen(rule, token.clone()));
        }

        tracing::info!(
            rules = self.rules.len(),
            listeners = listeners.len(),
            poll_interval_secs = self.poll_interval.as_secs_f64(),
            "scheduler started"
        );

        loop {
            self.run_pass(&token).await;
            tokio::select! {
                () = token.cancelled() => break,
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        while let Some(joined) = listeners.join_next().await {
            if let Err(err) = joined {
                tracing::warn!(%err, "event listener ended abnormally");
            }
        }
        tracing::info!("scheduler stopped");
    }
}

/// Run one pass of `rule`, containing any panic that escapes it.
///
/// Returns `None` when the pass panicked; the failure is logged and the
/// caller moves on.
pub(crate) async fn run_guarded(rule: &Rule) -> Option<RuleOutcome> {
    contained(rule.name(), rule.run()).await
}

async fn contained<T>(rule: &str, pass: impl Future<Output = T>) -> Option<T> {
    match AssertUnwindSafe(pass).catch_unwind().await {
        Ok(outcome) => Some(outcome),
        Err(payload) => {
            tracing::error!(
                rule = %rule,
                critical = true,
                panic = %panic_message(payload.as_ref()),
                "rule pass failed"
            );
            None
        }
    }
}
