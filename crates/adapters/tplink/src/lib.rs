//! # smarthub-adapter-tplink
//!
//! TP-Link Smart Home plugs (HS100/HS110 family) over their local TCP
//! protocol.
//!
//! ## Provided capabilities
//!
//! | Capability | Kind | Arguments | Effect |
//! |------------|------|-----------|--------|
//! | `plug` | action | `command, host`, option `payload` | sends a named command (or the raw `payload`), returns the reply |
//! | `plug_on` | condition | `host…`, option `op` (`"or"`/`"and"`) | relay state of the plugs, combined |
//!
//! ## Dependency rule
//!
//! Depends on `smarthub-app` (port traits) and `smarthub-domain` only.

mod client;
pub mod codec;
pub mod command;
mod config;
mod error;
mod plug;
#[cfg(test)]
mod testing;

use smarthub_app::registry::ProviderRegistry;
use smarthub_domain::error::ConfigError;

pub use client::{MAX_REPLY_LEN, TplinkClient};
pub use config::TplinkConfig;
pub use error::TplinkError;
pub use plug::{PlugAction, PlugOn};

/// Register `plug` and `plug_on` against plugs reachable with `config`.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateProvider`] if either name is taken.
pub fn register(registry: &mut ProviderRegistry, config: &TplinkConfig) -> Result<(), ConfigError> {
    let client = TplinkClient::new(config);
    let action_client = client.clone();
    registry.register_action("plug", move || PlugAction::new(action_client.clone()))?;
    registry.register_condition("plug_on", move || PlugOn::new(client.clone()))?;
    tracing::debug!(port = config.port, "tplink capabilities registered");
    Ok(())
}
