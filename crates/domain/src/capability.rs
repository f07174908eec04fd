//! Capability references — how a rule names the provider it needs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two kinds of capability a provider can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    /// Answers a boolean-ish question (`device_online`, `later_than`, …).
    Condition,
    /// Performs a side effect (`plug`, …).
    Action,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Condition => f.write_str("condition"),
            Self::Action => f.write_str("action"),
        }
    }
}

/// Identifies a provider by name and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityRef {
    pub name: String,
    pub kind: CapabilityKind,
}

impl CapabilityRef {
    #[must_use]
    pub fn condition(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CapabilityKind::Condition,
        }
    }

    #[must_use]
    pub fn action(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: CapabilityKind::Action,
        }
    }
}

impl fmt::Display for CapabilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}
