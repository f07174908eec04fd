//! `dash` — Amazon Dash style buttons spotted through their DHCP requests.
//!
//! A button wakes up, joins the network and asks for an address. The
//! listener watches for those requests and notifies every rule bound to the
//! requesting MAC address.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use smarthub_app::ports::{ConditionProvider, EventSink, EventSource};
use smarthub_domain::arguments::Arguments;
use smarthub_domain::error::ProviderError;
use smarthub_domain::signal::Signal;

use crate::error::NetworkError;

const BOOTREQUEST: u8 = 1;
const HTYPE_ETHERNET: u8 = 1;
const CHADDR: std::ops::Range<usize> = 28..34;
const MAGIC_COOKIE: [u8; 4] = [99, 130, 83, 99];
const OPTIONS_START: usize = 236;
const MAX_DATAGRAM: usize = 1500;
/// Pause after a failed receive before reading again.
const RECEIVE_BACKOFF: Duration = Duration::from_millis(500);

/// Client hardware address of a DHCP request, as lowercase `aa:bb:…`.
///
/// Anything that is not an Ethernet BOOTREQUEST carrying the DHCP magic
/// cookie yields `None`.
#[must_use]
pub fn client_mac(packet: &[u8]) -> Option<String> {
    if packet.len() < OPTIONS_START + MAGIC_COOKIE.len()
        || packet[0] != BOOTREQUEST
        || packet[1] != HTYPE_ETHERNET
        || packet[2] != 6
        || packet[OPTIONS_START..OPTIONS_START + MAGIC_COOKIE.len()] != MAGIC_COOKIE
    {
        return None;
    }
    let octets: Vec<String> = packet[CHADDR].iter().map(|b| format!("{b:02x}")).collect();
    Some(octets.join(":"))
}

/// Canonical form of a MAC address: six lowercase hex octets joined by `:`.
///
/// # Errors
///
/// Returns [`NetworkError::InvalidMac`] for anything else.
pub fn normalize_mac(mac: &str) -> Result<String, NetworkError> {
    let octets: Vec<&str> = mac.split([':', '-']).collect();
    if octets.len() != 6 || !octets.iter().copied().all(is_octet) {
        return Err(NetworkError::InvalidMac(mac.to_string()));
    }
    Ok(octets.join(":").to_ascii_lowercase())
}

fn is_octet(octet: &str) -> bool {
    octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit())
}

fn macs(arguments: &Arguments) -> Result<Vec<String>, ProviderError> {
    let macs = arguments.strings()?;
    if macs.is_empty() {
        return Err(ProviderError::InvalidArguments(
            "dash needs at least one MAC address".to_string(),
        ));
    }
    macs.into_iter()
        .map(|mac| normalize_mac(mac).map_err(ProviderError::from))
        .collect()
}

#[derive(Debug, Default)]
struct Buttons {
    subscribers: HashMap<String, Vec<EventSink>>,
    last_seen: HashMap<String, Instant>,
}

/// Shared handle on the button registrations; clones see the same buttons.
#[derive(Debug, Clone)]
pub struct DashButtons {
    buttons: Arc<Mutex<Buttons>>,
    flood_interval: Duration,
}

impl DashButtons {
    #[must_use]
    pub fn new(flood_interval: Duration) -> Self {
        Self {
            buttons: Arc::default(),
            flood_interval,
        }
    }

    /// Whether any rule is bound to a button.
    #[must_use]
    pub fn has_subscribers(&self) -> bool {
        !self
            .buttons
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .is_empty()
    }

    /// Handle one sighting of `mac`. Returns how many rules were notified.
    ///
    /// A sighting within the flood interval of the previous one is
    /// swallowed and pushes the window further out.
    pub fn press(&self, mac: &str) -> usize {
        let mac = mac.to_ascii_lowercase();
        let now = Instant::now();
        let mut buttons = self.buttons.lock().unwrap_or_else(PoisonError::into_inner);
        if !buttons.subscribers.contains_key(&mac) {
            return 0;
        }
        let previous = buttons.last_seen.insert(mac.clone(), now);
        if previous.is_some_and(|at| now.duration_since(at) <= self.flood_interval) {
            tracing::debug!(%mac, "button sighting within flood interval ignored");
            return 0;
        }
        let Some(sinks) = buttons.subscribers.get_mut(&mac) else {
            return 0;
        };
        sinks.retain(|sink| !sink.is_closed());
        let notified = sinks.iter().filter(|sink| sink.notify()).count();
        tracing::info!(%mac, rules = sinks.len(), "dash button pressed");
        notified
    }

    /// Bind the DHCP listener socket.
    ///
    /// # Errors
    ///
    /// Returns [`NetworkError::Bind`] when the address cannot be bound;
    /// port 67 usually needs elevated privileges.
    pub async fn bind(addr: &str) -> Result<UdpSocket, NetworkError> {
        UdpSocket::bind(addr)
            .await
            .map_err(|source| NetworkError::Bind {
                addr: addr.to_string(),
                source,
            })
    }

    /// Read DHCP requests from `socket` until `token` is cancelled.
    pub async fn serve(&self, socket: UdpSocket, token: CancellationToken) {
        tracing::info!(addr = ?socket.local_addr().ok(), "dash listener started");
        let mut buffer = vec![0u8; MAX_DATAGRAM];
        loop {
            tokio::select! {
                () = token.cancelled() => break,
                received = socket.recv_from(&mut buffer) => match received {
                    Ok((len, _)) => {
                        if let Some(mac) = client_mac(&buffer[..len]) {
                            self.press(&mac);
                        }
                    }
                    Err(err) => recover(&err).await,
                },
            }
        }
        tracing::info!("dash listener stopped");
    }
}

/// Log a failed receive and back off before the next read.
async fn recover(err: &std::io::Error) {
    tracing::warn!(%err, "dash listener receive failed, retrying");
    tokio::time::sleep(RECEIVE_BACKOFF).await;
}

#[async_trait]
impl ConditionProvider for DashButtons {
    async fn check(&self, _arguments: &Arguments) -> Result<Signal, ProviderError> {
        Err(ProviderError::Unsupported("dash buttons only fire events"))
    }

    fn validate(&self, arguments: &Arguments) -> Result<(), ProviderError> {
        macs(arguments).map(|_| ())
    }

    fn as_event_source(&self) -> Option<&dyn EventSource> {
        Some(self)
    }
}

impl EventSource for DashButtons {
    fn register(&self, sink: EventSink, arguments: &Arguments) -> Result<(), ProviderError> {
        let macs = macs(arguments)?;
        let mut buttons = self.buttons.lock().unwrap_or_else(PoisonError::into_inner);
        for mac in macs {
            tracing::debug!(rule = sink.rule(), %mac, "rule bound to dash button");
            let sinks = buttons.subscribers.entry(mac).or_default();
            sinks.push(sink.clone());
        }
        Ok(())
    }
}
