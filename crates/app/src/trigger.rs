//! Trigger — one condition-provider invocation with an evaluation mode.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use smarthub_domain::arguments::Arguments;
use smarthub_domain::capability::CapabilityRef;
use smarthub_domain::error::ConfigError;
use smarthub_domain::rule::{TriggerClause, TriggerMode};
use smarthub_domain::signal::Signal;

use crate::invoke::guarded;
use crate::ports::ConditionProvider;
use crate::registry::ProviderRegistry;

/// A guard of a rule.
///
/// Holds its own provider instance, its immutable arguments, and its own
/// last observed state. Two triggers on the same capability never share
/// edge-detection state.
pub struct Trigger {
    capability: CapabilityRef,
    mode: TriggerMode,
    arguments: Arguments,
    provider: Arc<dyn ConditionProvider>,
    last_state: Mutex<Option<bool>>,
}

impl Trigger {
    #[must_use]
    pub fn new(
        capability: impl Into<String>,
        mode: TriggerMode,
        arguments: Arguments,
        provider: Arc<dyn ConditionProvider>,
    ) -> Self {
        Self {
            capability: CapabilityRef::condition(capability),
            mode,
            arguments,
            provider,
            last_state: Mutex::new(None),
        }
    }

    /// Resolve the clause's capability and check its arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCapability`] if the capability is not
    /// registered, or [`ConfigError::InvalidArguments`] if the provider
    /// rejects the arguments.
    pub fn from_clause(
        clause: &TriggerClause,
        registry: &ProviderRegistry,
    ) -> Result<Self, ConfigError> {
        let provider = registry.resolve_condition(&clause.capability)?;
        provider
            .validate(&clause.arguments)
            .map_err(|reason| ConfigError::InvalidArguments {
                capability: clause.capability.clone(),
                reason,
            })?;
        Ok(Self::new(
            clause.capability.clone(),
            clause.mode,
            clause.arguments.clone(),
            provider,
        ))
    }

    #[must_use]
    pub fn capability(&self) -> &CapabilityRef {
        &self.capability
    }

    /// Key of this trigger inside its rule, before collision suffixes.
    #[must_use]
    pub fn key(&self) -> String {
        self.mode.key(&self.capability.name)
    }

    #[must_use]
    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    #[must_use]
    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    /// Last successful signal seen by this trigger, `None` before the first.
    #[must_use]
    pub fn last_state(&self) -> Option<bool> {
        *self.remembered()
    }

    fn remembered(&self) -> MutexGuard<'_, Option<bool>> {
        self.last_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Ask the provider and decide whether this trigger passes.
    ///
    /// Provider failures never escape: they are logged and count as a
    /// failed check, which does not pass in any mode.
    pub async fn evaluate(&self) -> bool {
        let signal = match guarded(self.provider.check(&self.arguments)).await {
            Ok(signal) => signal,
            Err(err) => {
                tracing::warn!(
                    capability = %self.capability,
                    arguments = %self.arguments,
                    %err,
                    "condition provider failed"
                );
                Signal::Error
            }
        };
        if signal.is_error() {
            tracing::debug!(
                capability = %self.capability,
                arguments = %self.arguments,
                "condition returned error state"
            );
        }

        self.mode.evaluate(&mut self.remembered(), signal)
    }
}

impl std::fmt::Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Trigger")
            .field("capability", &self.capability)
            .field("mode", &self.mode)
            .field("arguments", &self.arguments)
            .field("last_state", &self.last_state())
            .finish_non_exhaustive()
    }
}
