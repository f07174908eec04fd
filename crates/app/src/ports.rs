//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the rule engine and the outside world.
//! They are defined here (in `app`) so that both the engine and the
//! adapter crates can depend on them without creating circular dependencies.

pub mod event_source;
pub mod provider;

pub use event_source::{EventSink, EventSource};
pub use provider::{ActionProvider, ConditionProvider};
