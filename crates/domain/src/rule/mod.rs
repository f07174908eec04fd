//! Rule — ordered triggers guarding ordered operations.
//!
//! A [`RuleSpec`] is the static description of a rule as it appears in
//! configuration: a name, an ordered list of [`TriggerClause`]s that must
//! all pass (short-circuit AND), an ordered list of [`OperationClause`]s
//! executed best-effort once they do, and an optional [`EventClause`] that
//! makes the rule event-driven instead of polled.

mod event;
mod operation;
mod trigger;

pub use event::EventClause;
pub use operation::OperationClause;
pub use trigger::{TriggerClause, TriggerMode};

use serde::{Deserialize, Serialize};

use crate::arguments::Arguments;
use crate::error::ConfigError;

/// Static description of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default)]
    pub triggers: Vec<TriggerClause>,
    #[serde(default)]
    pub operations: Vec<OperationClause>,
    #[serde(default)]
    pub on: Option<EventClause>,
}

impl RuleSpec {
    /// Create a builder for constructing a [`RuleSpec`].
    #[must_use]
    pub fn builder() -> RuleSpecBuilder {
        RuleSpecBuilder::default()
    }

    /// Whether the rule is driven by an event source rather than polling.
    #[must_use]
    pub fn is_event_bound(&self) -> bool {
        self.on.is_some()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyRuleName`] when `name` is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyRuleName);
        }
        Ok(())
    }
}

/// Step-by-step builder for [`RuleSpec`], one method per clause kind.
#[derive(Debug, Default)]
pub struct RuleSpecBuilder {
    name: Option<String>,
    triggers: Vec<TriggerClause>,
    operations: Vec<OperationClause>,
    on: Option<EventClause>,
}

impl RuleSpecBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn trigger(mut self, clause: TriggerClause) -> Self {
        self.triggers.push(clause);
        self
    }

    fn clause(
        self,
        mode: TriggerMode,
        capability: impl Into<String>,
        arguments: Arguments,
    ) -> Self {
        self.trigger(TriggerClause::new(capability, mode, arguments))
    }

    /// `If`: pass while the condition holds.
    #[must_use]
    pub fn when(self, capability: impl Into<String>, arguments: Arguments) -> Self {
        self.clause(TriggerMode::Plain, capability, arguments)
    }

    /// `Not`: pass while the condition does not hold.
    #[must_use]
    pub fn unless(self, capability: impl Into<String>, arguments: Arguments) -> Self {
        self.clause(TriggerMode::Negated, capability, arguments)
    }

    /// `Once`: pass when the condition starts holding.
    #[must_use]
    pub fn once(self, capability: impl Into<String>, arguments: Arguments) -> Self {
        self.clause(TriggerMode::EdgePlain, capability, arguments)
    }

    /// `OnceNot`: pass when the condition stops holding.
    #[must_use]
    pub fn once_not(self, capability: impl Into<String>, arguments: Arguments) -> Self {
        self.clause(TriggerMode::EdgeNegated, capability, arguments)
    }

    /// `Then`: append an operation.
    #[must_use]
    pub fn then(mut self, capability: impl Into<String>, arguments: Arguments) -> Self {
        let clause = OperationClause::new(capability, arguments);
        self.operations.push(clause);
        self
    }

    /// `On`: drive the rule from an event source. A later call replaces an
    /// earlier one.
    #[must_use]
    pub fn on(mut self, capability: impl Into<String>, arguments: Arguments) -> Self {
        self.on = Some(EventClause::new(capability, arguments));
        self
    }

    /// Consume the builder, validate, and return a [`RuleSpec`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the name is missing or no operation was added.
    pub fn build(self) -> Result<RuleSpec, ConfigError> {
        let spec = RuleSpec {
            name: self.name.unwrap_or_default(),
            triggers: self.triggers,
            operations: self.operations,
            on: self.on,
        };
        spec.validate()?;
        Ok(spec)
    }
}

/// Derive a key that is unique among the keys for which `is_taken` holds.
///
/// Returns `base` when it is free, otherwise the first free candidate among
/// `base_0`, `base_1`, …. Existing keys are never renamed.
#[must_use]
pub fn unique_key(base: &str, is_taken: impl Fn(&str) -> bool) -> String {
    if !is_taken(base) {
        return base.to_string();
    }
    (0..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !is_taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evening_lamp() -> RuleSpec {
        RuleSpec::builder()
            .name("evening lamp")
            .when("week_day", Arguments::positional([0, 1, 2, 3, 4]))
            .when("later_than", Arguments::positional([20, 0]))
            .unless("later_than", Arguments::positional([23, 0]))
            .once(
                "device_online",
                Arguments::positional(["Macbook", "iPhone"]).with_option("op", "or"),
            )
            .then("plug", Arguments::positional(["on", "lamp"]))
            .then("plug", Arguments::positional(["off", "computer"]))
            .build()
            .unwrap()
    }

    #[test]
    fn should_build_rule_with_clauses_in_order() {
        let spec = evening_lamp();
        assert_eq!(spec.name, "evening lamp");
        let modes: Vec<_> = spec.triggers.iter().map(|t| t.mode).collect();
        assert_eq!(
            modes,
            [
                TriggerMode::Plain,
                TriggerMode::Plain,
                TriggerMode::Negated,
                TriggerMode::EdgePlain
            ]
        );
        assert_eq!(spec.operations.len(), 2);
        assert_eq!(spec.operations[0].arguments.str_at(1).unwrap(), "lamp");
        assert!(!spec.is_event_bound());
    }

    #[test]
    fn should_mark_rule_event_bound_when_on_is_set() {
        let spec = RuleSpec::builder()
            .name("dash button")
            .on("dash", Arguments::positional(["ac:63:be:00:11:22"]))
            .then("plug", Arguments::positional(["on", "lamp"]))
            .build()
            .unwrap();
        assert!(spec.is_event_bound());
        assert!(spec.triggers.is_empty());
    }

    #[test]
    fn should_add_once_not_trigger() {
        let spec = RuleSpec::builder()
            .name("away")
            .once_not("device_online", Arguments::positional(["iPhone"]))
            .then("plug", Arguments::positional(["off", "lamp"]))
            .build()
            .unwrap();
        assert_eq!(spec.triggers[0].mode, TriggerMode::EdgeNegated);
    }

    #[test]
    fn should_return_error_when_name_is_empty() {
        let result = RuleSpec::builder()
            .then("plug", Arguments::positional(["on", "lamp"]))
            .build();
        assert!(matches!(result, Err(ConfigError::EmptyRuleName)));
    }

    #[test]
    fn should_accept_rule_without_operations() {
        let spec = RuleSpec::builder().name("idle").build().unwrap();
        assert!(spec.operations.is_empty());
    }

    #[test]
    fn should_return_base_key_when_free() {
        assert_eq!(unique_key("plug", |_| false), "plug");
    }

    #[test]
    fn should_append_numeric_suffix_on_collision() {
        let mut keys: Vec<String> = Vec::new();
        for _ in 0..3 {
            let key = unique_key("later_than", |k| keys.iter().any(|existing| existing == k));
            keys.push(key);
        }
        assert_eq!(keys, ["later_than", "later_than_0", "later_than_1"]);
    }

    #[test]
    fn should_deserialize_rules_from_toml() {
        let toml = r#"
            name = "evening lamp"

            [[triggers]]
            capability = "week_day"
            args = [0, 1, 2, 3, 4]

            [[triggers]]
            capability = "later_than"
            mode = "not"
            args = [23, 0]

            [[triggers]]
            capability = "device_online"
            mode = "once"
            args = ["Macbook", "iPhone"]
            options = { op = "or" }

            [[operations]]
            capability = "plug"
            args = ["on", "lamp"]
        "#;
        let spec: RuleSpec = toml::from_str(toml).unwrap();
        spec.validate().unwrap();
        assert_eq!(spec.triggers.len(), 3);
        assert_eq!(spec.triggers[1].mode, TriggerMode::Negated);
        let combine = spec.triggers[2].arguments.option_str("op").unwrap();
        assert_eq!(combine, Some("or"));
        assert_eq!(spec.operations[0].capability, "plug");
        assert!(spec.on.is_none());
    }

    #[test]
    fn should_deserialize_event_clause_from_toml() {
        let toml = r#"
            name = "dash"
            on = { capability = "dash", args = ["AC:63:BE:00:11:22"] }

            [[operations]]
            capability = "plug"
            args = ["on", "lamp"]
        "#;
        let spec: RuleSpec = toml::from_str(toml).unwrap();
        let on = spec.on.unwrap();
        assert_eq!(on.capability, "dash");
        assert_eq!(on.arguments.str_at(0).unwrap(), "AC:63:BE:00:11:22");
    }
}
