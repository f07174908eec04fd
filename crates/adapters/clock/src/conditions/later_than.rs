//! `later_than(hour, minute)` — true from `hour:minute` until midnight.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveTime;

use smarthub_app::ports::ConditionProvider;
use smarthub_domain::arguments::Arguments;
use smarthub_domain::error::ProviderError;
use smarthub_domain::signal::Signal;

use crate::clock::Clock;

pub struct LaterThan {
    clock: Arc<dyn Clock>,
}

impl LaterThan {
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

/// The minute argument is optional and defaults to zero.
fn threshold(arguments: &Arguments) -> Result<NaiveTime, ProviderError> {
    if arguments.len() > 2 {
        return Err(ProviderError::InvalidArguments(
            "later_than takes an hour and an optional minute".to_string(),
        ));
    }
    let hour = arguments.u64_at(0)?;
    let minute = if arguments.len() == 2 {
        arguments.u64_at(1)?
    } else {
        0
    };
    let time = u32::try_from(hour)
        .ok()
        .zip(u32::try_from(minute).ok())
        .and_then(|(hour, minute)| NaiveTime::from_hms_opt(hour, minute, 0));
    time.ok_or_else(|| {
        ProviderError::InvalidArguments(format!("{hour}:{minute:02} is not a time of day"))
    })
}

#[async_trait]
impl ConditionProvider for LaterThan {
    async fn check(&self, arguments: &Arguments) -> Result<Signal, ProviderError> {
        let threshold = threshold(arguments)?;
        Ok(Signal::from(self.clock.now().time() >= threshold))
    }

    fn validate(&self, arguments: &Arguments) -> Result<(), ProviderError> {
        threshold(arguments).map(|_| ())
    }
}
