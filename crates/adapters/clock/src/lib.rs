//! # smarthub-adapter-clock
//!
//! Calendar and time-of-day conditions.
//!
//! ## Provided capabilities
//!
//! | Capability | Kind | Arguments | True when |
//! |------------|------|-----------|-----------|
//! | `week_day` | condition | `d0, d1, …` (0 = Monday … 6 = Sunday) | today is one of the listed days |
//! | `later_than` | condition | `hour, minute` | local time of day is at or after `hour:minute` |
//!
//! Both read the time from a [`Clock`], so tests can pin it with
//! [`FixedClock`].
//!
//! ## Dependency rule
//!
//! Depends on `smarthub-app` (port traits) and `smarthub-domain` only.

mod clock;
mod conditions;

use std::sync::Arc;

use smarthub_app::registry::ProviderRegistry;
use smarthub_domain::error::ConfigError;

pub use clock::{Clock, FixedClock, SystemClock};
pub use conditions::{LaterThan, WeekDay};

/// Register `week_day` and `later_than`, both reading `clock`.
///
/// # Errors
///
/// Returns [`ConfigError::DuplicateProvider`] if either name is taken.
pub fn register(registry: &mut ProviderRegistry, clock: Arc<dyn Clock>) -> Result<(), ConfigError> {
    let week_day_clock = Arc::clone(&clock);
    registry.register_condition("week_day", move || {
        WeekDay::new(Arc::clone(&week_day_clock))
    })?;
    registry.register_condition("later_than", move || LaterThan::new(Arc::clone(&clock)))?;
    tracing::debug!("clock conditions registered");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use smarthub_domain::arguments::Arguments;
    use smarthub_domain::capability::CapabilityKind;
    use smarthub_domain::signal::Signal;

    use super::*;

    fn tuesday_evening() -> Arc<FixedClock> {
        let at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        Arc::new(FixedClock::new(at))
    }

    #[test]
    fn should_register_both_conditions() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry, tuesday_evening()).unwrap();
        assert_eq!(
            registry.names(CapabilityKind::Condition),
            ["later_than", "week_day"]
        );
    }

    #[test]
    fn should_refuse_registering_twice() {
        let mut registry = ProviderRegistry::new();
        register(&mut registry, tuesday_evening()).unwrap();
        assert!(matches!(
            register(&mut registry, tuesday_evening()),
            Err(ConfigError::DuplicateProvider(_))
        ));
    }

    #[tokio::test]
    async fn should_share_the_injected_clock() {
        let clock = tuesday_evening();
        let mut registry = ProviderRegistry::new();
        register(&mut registry, Arc::clone(&clock) as Arc<dyn Clock>).unwrap();
        let later_than = registry.resolve_condition("later_than").unwrap();
        let evening = Arguments::positional([20, 0]);

        assert_eq!(later_than.check(&evening).await.unwrap(), Signal::On);

        clock.set(
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        );
        assert_eq!(later_than.check(&evening).await.unwrap(), Signal::Off);
    }
}
