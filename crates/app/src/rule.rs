//! Rule — ordered triggers guarding ordered operations.
//!
//! A rule is assembled once (`BUILDING`) and then frozen behind an `Arc`
//! by the [`RuleSet`](crate::rule_set::RuleSet) (`ACTIVE`). Once active,
//! the only state that still changes is each trigger's private last
//! observed signal, so [`Rule::run`] may be called concurrently from the
//! poll loop and from an event listener.

use smarthub_domain::arguments::Arguments;
use smarthub_domain::error::ConfigError;
use smarthub_domain::rule::{RuleSpec, unique_key};

use crate::operation::Operation;
use crate::ports::{ConditionProvider, EventSink};
use crate::registry::ProviderRegistry;
use crate::subscription::Subscription;
use crate::trigger::Trigger;

/// What happened during one pass of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    /// A trigger did not pass; nothing was executed.
    Aborted {
        /// Key of the trigger that stopped the pass.
        trigger: String,
    },
    /// Every trigger passed and every operation was attempted.
    Passed { succeeded: usize, failed: usize },
}

impl RuleOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

/// A named list of keyed triggers and keyed operations.
#[derive(Debug)]
pub struct Rule {
    name: String,
    triggers: Vec<(String, Trigger)>,
    operations: Vec<(String, Operation)>,
    event_source: Option<String>,
}

impl Rule {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            triggers: Vec::new(),
            operations: Vec::new(),
            event_source: None,
        }
    }

    /// Build a rule from its specification, resolving every capability.
    ///
    /// Returns the subscription to hand to the scheduler when the rule is
    /// event-bound.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the spec is invalid, a capability is
    /// unknown, arguments are rejected, or the event capability cannot push.
    pub fn from_spec(
        spec: &RuleSpec,
        registry: &ProviderRegistry,
    ) -> Result<(Self, Option<Subscription>), ConfigError> {
        spec.validate()?;

        if spec.operations.is_empty() {
            tracing::warn!(rule = %spec.name, "rule has no operations");
        }

        let mut rule = Self::new(spec.name.clone());
        for clause in &spec.triggers {
            rule.add_trigger(Trigger::from_clause(clause, registry)?);
        }
        for clause in &spec.operations {
            rule.add_operation(Operation::from_clause(clause, registry)?);
        }

        let subscription = match &spec.on {
            Some(on) => {
                let provider = registry.resolve_condition(&on.capability)?;
                let bound = rule.bind_event(&on.capability, provider.as_ref(), &on.arguments)?;
                Some(bound)
            }
            None => None,
        };
        Ok((rule, subscription))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a trigger, returning the key it was stored under.
    pub fn add_trigger(&mut self, trigger: Trigger) -> String {
        let key = unique_key(&trigger.key(), |candidate| {
            self.triggers.iter().any(|(key, _)| key == candidate)
        });
        self.triggers.push((key.clone(), trigger));
        key
    }

    /// Append an operation, returning the key it was stored under.
    pub fn add_operation(&mut self, operation: Operation) -> String {
        let key = unique_key(&operation.capability().name, |candidate| {
            self.operations.iter().any(|(key, _)| key == candidate)
        });
        self.operations.push((key.clone(), operation));
        key
    }

    /// Subscribe this rule to an event-capable provider.
    ///
    /// From then on the rule is skipped by the poll loop and run whenever
    /// the source notifies the returned [`Subscription`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotAnEventSource`] if the provider cannot push,
    /// or [`ConfigError::InvalidArguments`] if it refuses the registration.
    pub fn bind_event(
        &mut self,
        source: &str,
        provider: &dyn ConditionProvider,
        arguments: &Arguments,
    ) -> Result<Subscription, ConfigError> {
        let events = provider
            .as_event_source()
            .ok_or_else(|| ConfigError::NotAnEventSource {
                name: source.to_string(),
            })?;

        let (sink, receiver) = EventSink::channel(&self.name);
        events
            .register(sink, arguments)
            .map_err(|reason| ConfigError::InvalidArguments {
                capability: source.to_string(),
                reason,
            })?;

        self.event_source = Some(source.to_string());
        Ok(Subscription::new(source, receiver))
    }

    #[must_use]
    pub fn is_event_bound(&self) -> bool {
        self.event_source.is_some()
    }

    #[must_use]
    pub fn event_source(&self) -> Option<&str> {
        self.event_source.as_deref()
    }

    /// Trigger keys in evaluation order.
    pub fn trigger_keys(&self) -> impl Iterator<Item = &str> {
        self.triggers.iter().map(|(key, _)| key.as_str())
    }

    /// Operation keys in execution order.
    pub fn operation_keys(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(|(key, _)| key.as_str())
    }

    #[must_use]
    pub fn trigger(&self, key: &str) -> Option<&Trigger> {
        self.triggers
            .iter()
            .find_map(|(k, trigger)| (k == key).then_some(trigger))
    }

    /// Run one pass.
    ///
    /// Triggers are evaluated in insertion order and the pass stops at the
    /// first one that does not pass. Otherwise every operation is executed
    /// in insertion order, whether or not the previous ones failed.
    #[tracing::instrument(name = "rule", skip_all, fields(rule = %self.name))]
    pub async fn run(&self) -> RuleOutcome {
        tracing::debug!("evaluating rule");

        for (key, trigger) in &self.triggers {
            if !trigger.evaluate().await {
                tracing::debug!(trigger = %key, "rule terminated at trigger");
                return RuleOutcome::Aborted {
                    trigger: key.clone(),
                };
            }
        }

        tracing::info!("rule passed");
        let mut succeeded = 0;
        let mut failed = 0;
        for (key, operation) in &self.operations {
            tracing::debug!(operation = %key, call = %operation.describe(), "execute");
            match operation.execute().await {
                Ok(Some(result)) => {
                    tracing::debug!(operation = %key, %result, "execute returned");
                    succeeded += 1;
                }
                Ok(None) => succeeded += 1,
                Err(_) => failed += 1,
            }
        }
        RuleOutcome::Passed { succeeded, failed }
    }
}
