//! The provider invocation boundary.
//!
//! Every call into a provider goes through `guarded`, which yields a plain
//! `Result` whether the provider returned an error or panicked.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;

use smarthub_domain::error::ProviderError;

/// Await `call`, turning a panic into [`ProviderError::Panicked`].
pub(crate) async fn guarded<T, F>(call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(ProviderError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// Best-effort text of a panic payload.
#[must_use]
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
