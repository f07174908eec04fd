//! Signal — what a condition provider reports.

use std::fmt;

/// The answer of a condition provider.
///
/// [`Signal::Error`] is the sentinel for "the check itself failed", which is
/// distinct from a valid `Off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    On,
    Off,
    Error,
}

impl Signal {
    /// The boolean value carried by a successful signal.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::On => Some(true),
            Self::Off => Some(false),
            Self::Error => None,
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

impl From<bool> for Signal {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("on"),
            Self::Off => f.write_str("off"),
            Self::Error => f.write_str("error"),
        }
    }
}
