//! TP-Link adapter error types.

use std::time::Duration;

use smarthub_domain::error::ProviderError;

/// Errors specific to the TP-Link adapter.
#[derive(Debug, thiserror::Error)]
pub enum TplinkError {
    /// Connecting to, writing to or reading from the plug failed.
    #[error("plug connection failed")]
    Io(#[source] std::io::Error),

    /// The plug did not answer in time.
    #[error("plug did not answer within {0:?}")]
    Timeout(Duration),

    /// The plug announced a reply larger than any it legitimately sends.
    #[error("reply of {0} bytes exceeds the frame limit")]
    FrameTooLarge(usize),

    /// The request or the reply was not valid JSON.
    #[error("invalid JSON payload")]
    Payload(#[source] serde_json::Error),

    /// The command is not a named one and no raw `payload` was given.
    #[error("unknown command {0:?} and no payload option")]
    UnknownCommand(String),

    /// The reply lacks a field the caller needs.
    #[error("reply has no {0}")]
    MissingField(&'static str),
}

impl From<TplinkError> for ProviderError {
    fn from(err: TplinkError) -> Self {
        match err {
            TplinkError::Io(err) => Self::Io(err),
            TplinkError::Timeout(after) => Self::Timeout(after),
            TplinkError::UnknownCommand(_) => Self::InvalidArguments(err.to_string()),
            TplinkError::FrameTooLarge(_) | TplinkError::MissingField(_) => {
                Self::Protocol(err.to_string())
            }
            TplinkError::Payload(_) => Self::other(err),
        }
    }
}
