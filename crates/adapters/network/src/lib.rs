//! # smarthub-adapter-network
//!
//! Presence on the local network.
//!
//! ## Provided capabilities
//!
//! | Capability | Kind | Arguments | Behaviour |
//! |------------|------|-----------|-----------|
//! | `device_online` | condition | `host…`, option `op` (`"or"`/`"and"`) | hosts answering every `ping`, combined |
//! | `dash` | event source | `mac…` | fires when a listed button sends a DHCP request |
//!
//! The `dash` buttons are only heard once [`DashButtons::serve`] runs on a
//! socket from [`DashButtons::bind`].
//!
//! ## Dependency rule
//!
//! Depends on `smarthub-app` (port traits) and `smarthub-domain` only.

mod config;
mod dash;
mod error;
mod ping;

use std::sync::Arc;

use smarthub_app::registry::ProviderRegistry;
use smarthub_domain::error::ConfigError;

pub use config::NetworkConfig;
pub use dash::{DashButtons, client_mac, normalize_mac};
pub use error::NetworkError;
pub use ping::{DeviceOnline, Probe, SystemPing, lost_nothing};

/// Register `device_online` and `dash`.
///
/// Returns the button handle every `dash` registration lands on, for the
/// caller to serve.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateProvider`] if either name is taken.
pub fn register(
    registry: &mut ProviderRegistry,
    config: &NetworkConfig,
) -> Result<DashButtons, ConfigError> {
    let probe: Arc<dyn Probe> = Arc::new(SystemPing::new(config));
    registry.register_condition("device_online", move || {
        DeviceOnline::new(Arc::clone(&probe))
    })?;

    let dash = DashButtons::new(config.flood_interval());
    let shared = dash.clone();
    registry.register_condition("dash", move || shared.clone())?;
    tracing::debug!("network capabilities registered");
    Ok(dash)
}
