//! Rule set — every rule of the process, in configuration order.

use std::collections::HashSet;
use std::sync::Arc;

use smarthub_domain::error::ConfigError;
use smarthub_domain::rule::RuleSpec;

use crate::registry::ProviderRegistry;
use crate::rule::Rule;
use crate::subscription::Subscription;

/// Ordered, read-only collection of active rules.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Arc<Rule>>,
    subscriptions: Vec<(Arc<Rule>, Subscription)>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every rule, in order. Any configuration error aborts the build.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] raised by a rule.
    pub fn build(specs: &[RuleSpec], registry: &ProviderRegistry) -> Result<Self, ConfigError> {
        let mut set = Self::new();
        let mut names = HashSet::new();
        for spec in specs {
            if !names.insert(spec.name.as_str()) {
                tracing::warn!(rule = %spec.name, "rule name used more than once");
            }
            let (rule, subscription) = Rule::from_spec(spec, registry)?;
            set.push(rule, subscription);
        }
        tracing::info!(
            rules = set.len(),
            event_bound = set.subscriptions.len(),
            "rule set built"
        );
        Ok(set)
    }

    /// Activate `rule`. From here on it is never mutated structurally.
    pub fn push(&mut self, rule: Rule, subscription: Option<Subscription>) {
        let rule = Arc::new(rule);
        if let Some(subscription) = subscription {
            self.subscriptions.push((Arc::clone(&rule), subscription));
        }
        self.rules.push(rule);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter()
    }

    /// Rules visited by the poll loop, in configuration order.
    pub fn polled(&self) -> impl Iterator<Item = &Arc<Rule>> {
        self.rules.iter().filter(|rule| !rule.is_event_bound())
    }

    /// Hand over the event subscriptions; a second call returns nothing.
    pub fn take_subscriptions(&mut self) -> Vec<(Arc<Rule>, Subscription)> {
        std::mem::take(&mut self.subscriptions)
    }
}
