//! # smarthub-domain
//!
//! Pure domain model for the smarthub rule engine.
//!
//! ## Responsibilities
//! - Foundational types: capability references, provider [`Signal`](signal::Signal)s,
//!   invocation [`Arguments`](arguments::Arguments), error conventions
//! - Define **trigger modes** and the edge-detection state machine
//! - Define **rule specifications** (`If` / `Not` / `Once` / `OnceNot` / `Then` / `On`
//!   clauses) as plain value objects that can be deserialized from configuration
//! - Derive unique trigger and operation keys inside a rule
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod arguments;
pub mod capability;
pub mod error;
pub mod rule;
pub mod signal;
