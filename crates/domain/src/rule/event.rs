//! Event clauses — the `On` binding that replaces polling for a rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arguments::Arguments;

/// Binds a rule to an event-capable condition provider.
///
/// A rule with an event clause is run whenever the source signals and is
/// never visited by the poll loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventClause {
    /// Name of the event-capable condition capability.
    pub capability: String,
    #[serde(flatten)]
    pub arguments: Arguments,
}

impl EventClause {
    #[must_use]
    pub fn new(capability: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            capability: capability.into(),
            arguments,
        }
    }
}

impl fmt::Display for EventClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "on {}{}", self.capability, self.arguments)
    }
}
