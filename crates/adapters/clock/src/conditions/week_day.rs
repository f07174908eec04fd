//! `week_day(d0, d1, …)` — true on the listed days, 0 being Monday.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Datelike;

use smarthub_app::ports::ConditionProvider;
use smarthub_domain::arguments::Arguments;
use smarthub_domain::error::ProviderError;
use smarthub_domain::signal::Signal;

use crate::clock::Clock;

const SUNDAY: u64 = 6;

pub struct WeekDay {
    clock: Arc<dyn Clock>,
}

impl WeekDay {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

fn days(arguments: &Arguments) -> Result<Vec<u64>, ProviderError> {
    if arguments.is_empty() {
        return Err(ProviderError::InvalidArguments(
            "week_day needs at least one day".to_string(),
        ));
    }
    (0..arguments.len())
        .map(|index| {
            let day = arguments.u64_at(index)?;
            if day > SUNDAY {
                return Err(ProviderError::InvalidArguments(format!(
                    "day {day} is out of range 0..={SUNDAY}"
                )));
            }
            Ok(day)
        })
        .collect()
}

#[async_trait]
impl ConditionProvider for WeekDay {
    async fn check(&self, arguments: &Arguments) -> Result<Signal, ProviderError> {
        let days = days(arguments)?;
        let today = u64::from(self.clock.now().weekday().num_days_from_monday());
        Ok(Signal::from(days.contains(&today)))
    }

    fn validate(&self, arguments: &Arguments) -> Result<(), ProviderError> {
        days(arguments).map(|_| ())
    }
}
