//! Provider registry — maps capability names to provider factories.
//!
//! Populated once at startup by explicit registration calls. Every trigger
//! and operation resolves its own provider instance through the factory;
//! a factory that wants shared state hands out clones of a shared handle.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use smarthub_domain::capability::{CapabilityKind, CapabilityRef};
use smarthub_domain::error::ConfigError;

use crate::ports::{ActionProvider, ConditionProvider};

type ConditionFactory = Box<dyn Fn() -> Arc<dyn ConditionProvider> + Send + Sync>;
type ActionFactory = Box<dyn Fn() -> Arc<dyn ActionProvider> + Send + Sync>;

/// Capability name → provider factory, one namespace per kind.
#[derive(Default)]
pub struct ProviderRegistry {
    conditions: HashMap<String, ConditionFactory>,
    actions: HashMap<String, ActionFactory>,
}

impl ProviderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a condition capability.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateProvider`] if `name` is already taken
    /// by another condition.
    pub fn register_condition<F, P>(&mut self, name: &str, factory: F) -> Result<(), ConfigError>
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: ConditionProvider + 'static,
    {
        let Entry::Vacant(slot) = self.conditions.entry(name.to_string()) else {
            return Err(ConfigError::DuplicateProvider(CapabilityRef::condition(name)));
        };
        slot.insert(Box::new(move || Arc::new(factory()) as Arc<dyn ConditionProvider>));
        tracing::debug!(capability = name, "condition registered");
        Ok(())
    }

    /// Register an action capability.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DuplicateProvider`] if `name` is already taken
    /// by another action.
    pub fn register_action<F, P>(&mut self, name: &str, factory: F) -> Result<(), ConfigError>
    where
        F: Fn() -> P + Send + Sync + 'static,
        P: ActionProvider + 'static,
    {
        let Entry::Vacant(slot) = self.actions.entry(name.to_string()) else {
            return Err(ConfigError::DuplicateProvider(CapabilityRef::action(name)));
        };
        slot.insert(Box::new(move || Arc::new(factory()) as Arc<dyn ActionProvider>));
        tracing::debug!(capability = name, "action registered");
        Ok(())
    }

    /// Obtain a fresh condition provider instance.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCapability`] if nothing is registered
    /// under `name`.
    pub fn resolve_condition(&self, name: &str) -> Result<Arc<dyn ConditionProvider>, ConfigError> {
        self.conditions
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownCapability(CapabilityRef::condition(name)))
    }

    /// Obtain a fresh action provider instance.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCapability`] if nothing is registered
    /// under `name`.
    pub fn resolve_action(&self, name: &str) -> Result<Arc<dyn ActionProvider>, ConfigError> {
        self.actions
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ConfigError::UnknownCapability(CapabilityRef::action(name)))
    }

    /// Registered capability names of `kind`, sorted.
    #[must_use]
    pub fn names(&self, kind: CapabilityKind) -> Vec<&str> {
        let mut names: Vec<&str> = match kind {
            CapabilityKind::Condition => self.conditions.keys().map(String::as_str).collect(),
            CapabilityKind::Action => self.actions.keys().map(String::as_str).collect(),
        };
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("conditions", &self.names(CapabilityKind::Condition))
            .field("actions", &self.names(CapabilityKind::Action))
            .finish()
    }
}
