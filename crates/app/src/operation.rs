//! Operation — one action-provider invocation.

use std::fmt;
use std::sync::Arc;

use smarthub_domain::arguments::Arguments;
use smarthub_domain::capability::CapabilityRef;
use smarthub_domain::error::{ConfigError, ProviderError};
use smarthub_domain::rule::OperationClause;

use crate::invoke::guarded;
use crate::ports::ActionProvider;
use crate::registry::ProviderRegistry;

/// A side effect of a rule. Stateless across invocations.
pub struct Operation {
    capability: CapabilityRef,
    arguments: Arguments,
    provider: Arc<dyn ActionProvider>,
}

/// What an operation would do, without doing it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptor<'a> {
    pub name: &'a str,
    pub arguments: &'a Arguments,
}

impl fmt::Display for Descriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.arguments)
    }
}

impl Operation {
    #[must_use]
    pub fn new(
        capability: impl Into<String>,
        arguments: Arguments,
        provider: Arc<dyn ActionProvider>,
    ) -> Self {
        Self {
            capability: CapabilityRef::action(capability),
            arguments,
            provider,
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
        clause: &OperationClause,
        registry: &ProviderRegistry,
    ) -> Result<Self, ConfigError> {
        let provider = registry.resolve_action(&clause.capability)?;
        provider
            .validate(&clause.arguments)
            .map_err(|reason| ConfigError::InvalidArguments {
                capability: clause.capability.clone(),
                reason,
            })?;
        Ok(Self::new(
            clause.capability.clone(),
            clause.arguments.clone(),
            provider,
        ))
    }

    #[must_use]
    pub fn capability(&self) -> &CapabilityRef {
        &self.capability
    }

    /// Name and arguments of this operation. No side effect.
    #[must_use]
    pub fn describe(&self) -> Descriptor<'_> {
        Descriptor {
            name: &self.capability.name,
            arguments: &self.arguments,
        }
    }

    /// Invoke the provider.
    ///
    /// A failure is logged here and returned so the caller can account
    /// for it; it is never fatal to the rule.
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or [`ProviderError::Panicked`].
    pub async fn execute(&self) -> Result<Option<serde_json::Value>, ProviderError> {
        let result = guarded(self.provider.execute(&self.arguments)).await;
        if let Err(err) = &result {
            tracing::warn!(
                operation = %self.describe(),
                %err,
                "action provider failed"
            );
        }
        result
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("capability", &self.capability)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}
