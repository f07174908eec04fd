//! # smarthubd — smarthub daemon
//!
//! Composition root that wires all adapters together and runs the rules.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Install the `tracing` subscriber
//! - Register every adapter's capabilities in one provider registry
//! - Build the configured rules; a configuration error stops here
//! - Serve the Dash button listener when a rule is bound to a button
//! - Run the scheduler until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use smarthub_adapter_clock::SystemClock;
use smarthub_adapter_network::DashButtons;
use smarthub_app::invoke::panic_message;
use smarthub_app::registry::ProviderRegistry;
use smarthub_app::rule_set::RuleSet;
use smarthub_app::scheduler::Scheduler;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    log_panics();

    // Capabilities
    let mut registry = ProviderRegistry::new();
    smarthub_adapter_clock::register(&mut registry, Arc::new(SystemClock))?;
    smarthub_adapter_tplink::register(&mut registry, &config.tplink)?;
    let dash = smarthub_adapter_network::register(&mut registry, &config.network)?;
    tracing::debug!(?registry, "capabilities registered");

    // Rules
    let rules = RuleSet::build(&config.rules, &registry).context("invalid rule configuration")?;

    let token = CancellationToken::new();

    // Dash buttons
    let listener = if dash.has_subscribers() {
        let socket = DashButtons::bind(&config.network.dash_bind).await?;
        let token = token.clone();
        Some(tokio::spawn(async move { dash.serve(socket, token).await }))
    } else {
        None
    };

    tokio::spawn(cancel_on_shutdown(token.clone()));

    tracing::info!(
        rules = rules.len(),
        poll_interval_secs = config.scheduler.poll_interval_secs,
        "smarthubd started"
    );
    let scheduler = Scheduler::new(rules, config.poll_interval());
    scheduler.run(token).await;

    if let Some(listener) = listener {
        listener.await.context("dash listener ended abnormally")?;
    }
    tracing::info!("smarthubd stopped");
    Ok(())
}

/// Report panics through `tracing` instead of the default stderr hook.
fn log_panics() {
    std::panic::set_hook(Box::new(|info| {
        let location = info.location().map(ToString::to_string);
        tracing::error!(
            reason = %panic_message(info.payload()),
            location = location.as_deref().unwrap_or("unknown"),
            "panicked"
        );
    }));
}

/// Cancel `token` on Ctrl+C, or on SIGTERM on Unix.
async fn cancel_on_shutdown(token: CancellationToken) {
    let interrupt = wait_for("SIGINT", tokio::signal::ctrl_c());

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let terminate = wait_for("SIGTERM", async {
            signal(SignalKind::terminate())?.recv().await;
            Ok::<(), std::io::Error>(())
        });
        tokio::select! {
            () = interrupt => {},
            () = terminate => {},
        }
    }
    #[cfg(not(unix))]
    interrupt.await;

    tracing::info!("shutdown requested");
    token.cancel();
}

/// Wait for `signal`. A handler that cannot be installed never fires.
async fn wait_for(name: &str, signal: impl Future<Output = std::io::Result<()>>) {
    if let Err(err) = signal.await {
        tracing::warn!(%err, signal = name, "cannot listen for signal");
        std::future::pending::<()>().await;
    }
}
