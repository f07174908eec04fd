//! Time sources for the clock conditions.

use std::sync::{Mutex, PoisonError};

use chrono::NaiveDateTime;

/// Where the clock conditions read the local wall-clock time from.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The host's local time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    at: Mutex<NaiveDateTime>,
}

impl FixedClock {
    #[must_use]
    pub fn new(at: NaiveDateTime) -> Self {
        Self { at: Mutex::new(at) }
    }

    pub fn set(&self, at: NaiveDateTime) {
        *self.at.lock().unwrap_or_else(PoisonError::into_inner) = at;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.at.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
