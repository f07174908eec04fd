//! Trigger clauses and the evaluation modes that interpret a [`Signal`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::arguments::Arguments;
use crate::signal::Signal;

/// How a trigger turns its provider's signal into a pass/abort decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TriggerMode {
    /// Passes while the signal is on.
    #[default]
    #[serde(rename = "if")]
    Plain,
    /// Passes while the signal is off.
    #[serde(rename = "not")]
    Negated,
    /// Passes once, on the transition into on.
    #[serde(rename = "once")]
    EdgePlain,
    /// Passes once, on the transition into off.
    #[serde(rename = "once_not")]
    EdgeNegated,
}

impl TriggerMode {
    #[must_use]
    pub fn is_edge(self) -> bool {
        matches!(self, Self::EdgePlain | Self::EdgeNegated)
    }

    /// The value this mode is *not* looking for.
    #[must_use]
    pub fn reverse(self) -> bool {
        matches!(self, Self::Negated | Self::EdgeNegated)
    }

    /// Key of a trigger on `capability` inside its rule, before collision
    /// suffixes.
    #[must_use]
    pub fn key(self, capability: &str) -> String {
        let prefix = match self {
            Self::Plain => "",
            Self::Negated => "not_",
            Self::EdgePlain => "once_",
            Self::EdgeNegated => "oncenot_",
        };
        format!("{prefix}{capability}")
    }

    /// Decide whether a trigger in this mode passes for `signal`.
    ///
    /// `last_state` is the trigger's own memory of the previous successful
    /// signal. It is updated on every successful signal and left untouched
    /// when the provider errored. An errored signal never passes, whatever
    /// the mode.
    ///
    /// Edge modes never pass on the first observation: it only records the
    /// baseline.
    #[must_use]
    pub fn evaluate(self, last_state: &mut Option<bool>, signal: Signal) -> bool {
        let Some(value) = signal.as_bool() else {
            return false;
        };
        let previous = last_state.replace(value);

        if !self.is_edge() {
            return value != self.reverse();
        }
        match previous {
            None => false,
            Some(previous) => previous != value && value != self.reverse(),
        }
    }
}

impl fmt::Display for TriggerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => f.write_str("if"),
            Self::Negated => f.write_str("not"),
            Self::EdgePlain => f.write_str("once"),
            Self::EdgeNegated => f.write_str("once_not"),
        }
    }
}

/// One `If` / `Not` / `Once` / `OnceNot` clause of a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerClause {
    /// Name of the condition capability.
    pub capability: String,
    #[serde(default)]
    pub mode: TriggerMode,
    #[serde(flatten)]
    pub arguments: Arguments,
}

impl TriggerClause {
    #[must_use]
    pub fn new(capability: impl Into<String>, mode: TriggerMode, arguments: Arguments) -> Self {
        Self {
            capability: capability.into(),
            mode,
            arguments,
        }
    }
}

impl fmt::Display for TriggerClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}{}", self.mode, self.capability, self.arguments)
    }
}
