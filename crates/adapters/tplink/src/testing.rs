//! A loopback plug for the tests of this crate.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::codec::{self, HEADER_LEN};

/// Answers every request with `reply(request)` and records the requests.
pub struct FakePlug {
    port: u16,
    received: Arc<Mutex<Vec<Value>>>,
    task: Option<JoinHandle<()>>,
    _idle: Option<TcpListener>,
}

impl FakePlug {
    pub async fn spawn<F>(reply: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let received = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&received);
        let task = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut header = [0u8; HEADER_LEN];
                if stream.read_exact(&mut header).await.is_err() {
                    continue;
                }
                let mut body = vec![0u8; codec::body_len(header)];
                if stream.read_exact(&mut body).await.is_err() {
                    continue;
                }
                let request: Value = serde_json::from_slice(&codec::decrypt(&body)).unwrap();
                let response = reply(&request);
                log.lock().unwrap().push(request);
                let _ = stream
                    .write_all(&codec::encode(response.to_string().as_bytes()))
                    .await;
            }
        });
        Self {
            port,
            received,
            task: Some(task),
            _idle: None,
        }
    }

    /// A plug whose `get_sysinfo` reports `relay_state`.
    pub async fn relay(relay_state: u8) -> Self {
        let sysinfo = json!({"system": {"get_sysinfo": {"relay_state": relay_state}}});
        Self::spawn(move |_| sysinfo.clone()).await
    }

    /// Accepts connections but never answers.
    pub async fn silent() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        Self {
            port: listener.local_addr().unwrap().port(),
            received: Arc::default(),
            task: None,
            _idle: Some(listener),
        }
    }

    /// A loopback port nobody listens on.
    pub async fn unused_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn received(&self) -> Vec<Value> {
        self.received.lock().unwrap().clone()
    }
}

impl Drop for FakePlug {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}
