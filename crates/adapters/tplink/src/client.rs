//! One-shot TCP exchanges with a plug.

use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::codec::{self, HEADER_LEN};
use crate::command;
use crate::config::TplinkConfig;
use crate::error::TplinkError;

/// Largest reply accepted from a plug.
pub const MAX_REPLY_LEN: usize = 64 * 1024;

/// Opens a fresh connection per request, as the plugs expect.
#[derive(Debug, Clone)]
pub struct TplinkClient {
    port: u16,
    timeout: Duration,
}

impl TplinkClient {
    #[must_use]
    pub fn new(config: &TplinkConfig) -> Self {
        Self {
            port: config.port,
            timeout: config.timeout(),
        }
    }

    /// Send `request` to `host` and decode the JSON reply.
    ///
    /// # Errors
    ///
    /// Returns [`TplinkError::Timeout`] when the whole exchange exceeds the
    /// configured budget, or the IO, framing or JSON error that ended it.
    #[tracing::instrument(level = "debug", skip(self, request), fields(port = self.port))]
    pub async fn send(&self, host: &str, request: &str) -> Result<Value, TplinkError> {
        let reply = tokio::time::timeout(self.timeout, self.exchange(host, request.as_bytes()))
            .await
            .map_err(|_| TplinkError::Timeout(self.timeout))??;
        let reply = serde_json::from_slice(&reply).map_err(TplinkError::Payload)?;
        tracing::debug!(%reply, "plug replied");
        Ok(reply)
    }

    /// Whether the relay of the plug at `host` is closed.
    ///
    /// # Errors
    ///
    /// Returns the error of [`send`](Self::send), or
    /// [`TplinkError::MissingField`] when the reply has no relay state.
    pub async fn relay_on(&self, host: &str) -> Result<bool, TplinkError> {
        let info = command::named("info").ok_or(TplinkError::MissingField("info command"))?;
        let reply = self.send(host, info).await?;
        reply
            .pointer("/system/get_sysinfo/relay_state")
            .and_then(Value::as_u64)
            .map(|state| state == 1)
            .ok_or(TplinkError::MissingField("relay_state"))
    }

    async fn exchange(&self, host: &str, request: &[u8]) -> Result<Vec<u8>, TplinkError> {
        let mut stream = TcpStream::connect((host, self.port))
            .await
            .map_err(TplinkError::Io)?;
        stream
            .write_all(&codec::encode(request))
            .await
            .map_err(TplinkError::Io)?;

        let mut header = [0u8; HEADER_LEN];
        stream
            .read_exact(&mut header)
            .await
            .map_err(TplinkError::Io)?;
        let len = codec::body_len(header);
        if len > MAX_REPLY_LEN {
            return Err(TplinkError::FrameTooLarge(len));
        }
        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).await.map_err(TplinkError::Io)?;
        Ok(codec::decrypt(&body))
    }
}
