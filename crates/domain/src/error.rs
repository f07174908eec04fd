//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts via `#[from]`.
//! Configuration errors are fatal at startup; provider errors are always
//! recovered at the trigger/operation boundary and only ever logged.

use std::time::Duration;

use crate::capability::CapabilityRef;

/// A malformed rule set or an unresolvable capability.
///
/// Raised while building rules, before the scheduler starts.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown capability {0}")]
    UnknownCapability(CapabilityRef),

    #[error("capability {0} is already registered")]
    DuplicateProvider(CapabilityRef),

    #[error("rule name must not be empty")]
    EmptyRuleName,

    #[error("capability {name:?} cannot be used as an event source")]
    NotAnEventSource { name: String },

    #[error("invalid arguments for {capability:?}")]
    InvalidArguments {
        capability: String,
        #[source]
        reason: ProviderError,
    },

    #[error("invalid configuration: {0}")]
    Validation(String),
}

/// Failure of a single provider invocation.
///
/// Never propagates past a trigger or an operation: the trigger folds it
/// into a `false` outcome and the operation into "no result".
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("i/o failure")]
    Io(#[from] std::io::Error),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("provider panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
    /// Wrap any foreign error.
    pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Other(Box::new(err))
    }
}
