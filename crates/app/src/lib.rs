//! # smarthub-app
//!
//! Application layer — the rule engine and its **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `ConditionProvider` — answers a boolean-ish question, or reports an error
//!   - `ActionProvider` — performs a side effect, optionally returning a result
//!   - `EventSource` — pushes notifications instead of being polled
//! - Resolve capability names to providers through the
//!   [`ProviderRegistry`](registry::ProviderRegistry)
//! - Evaluate rules: [`Trigger`](trigger::Trigger)s with short-circuit AND, then
//!   [`Operation`](operation::Operation)s best-effort
//! - Drive polled rules from the [`Scheduler`](scheduler::Scheduler) and
//!   event-bound rules from their subscriptions
//!
//! ## Dependency rule
//! Depends on `smarthub-domain` only (plus `tokio` for channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod invoke;
pub mod operation;
pub mod ports;
pub mod registry;
pub mod rule;
pub mod rule_set;
pub mod scheduler;
pub mod subscription;
pub mod trigger;

#[cfg(test)]
mod testing;
