//! Operation clauses — the `Then` steps of a rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arguments::Arguments;

/// One `Then` clause of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationClause {
    /// Name of the action capability.
    pub capability: String,
    #[serde(flatten)]
    pub arguments: Arguments,
}

impl OperationClause {
    #[must_use]
    pub fn new(capability: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            capability: capability.into(),
            arguments,
        }
    }
}

impl fmt::Display for OperationClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.capability, self.arguments)
    }
}
