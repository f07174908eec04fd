//! Hand-written fake providers shared by the unit tests of this crate.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use smarthub_domain::arguments::Arguments;
use smarthub_domain::error::ProviderError;
use smarthub_domain::signal::Signal;

use crate::ports::{ActionProvider, ConditionProvider, EventSink, EventSource};

/// Always answers the same signal and counts its calls.
#[derive(Clone)]
pub struct FixedCondition {
    signal: Signal,
    pub calls: Arc<AtomicUsize>,
}

impl FixedCondition {
    pub fn new(signal: Signal) -> Self {
        Self {
            signal,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConditionProvider for FixedCondition {
    async fn check(&self, _arguments: &Arguments) -> Result<Signal, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.signal)
    }
}

/// Replays a scripted sequence of signals, then keeps answering the last one.
pub struct ScriptedCondition {
    script: Mutex<VecDeque<Signal>>,
    last: Mutex<Signal>,
}

impl ScriptedCondition {
    pub fn new(script: impl IntoIterator<Item = Signal>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            last: Mutex::new(Signal::Error),
        }
    }
}

#[async_trait]
impl ConditionProvider for ScriptedCondition {
    async fn check(&self, _arguments: &Arguments) -> Result<Signal, ProviderError> {
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(signal) = next {
            *last = signal;
        }
        Ok(*last)
    }
}

/// Fails every call, either with an error or with a panic.
pub struct BrokenCondition {
    pub panic: bool,
}

#[async_trait]
impl ConditionProvider for BrokenCondition {
    async fn check(&self, _arguments: &Arguments) -> Result<Signal, ProviderError> {
        assert!(!self.panic, "probe exploded");
        Err(ProviderError::Io(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "no route to host",
        )))
    }
}

/// Appends `"<label> <arguments>"` to a shared log on every call.
#[derive(Clone)]
pub struct RecordingAction {
    label: &'static str,
    pub log: Arc<Mutex<Vec<String>>>,
    result: Option<serde_json::Value>,
}

impl RecordingAction {
    pub fn new(label: &'static str, log: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            label,
            log,
            result: None,
        }
    }

    pub fn detached() -> Self {
        Self::new("detached", Arc::default())
    }

    pub fn returning(mut self, result: serde_json::Value) -> Self {
        self.result = Some(result);
        self
    }
}

#[async_trait]
impl ActionProvider for RecordingAction {
    async fn execute(
        &self,
        arguments: &Arguments,
    ) -> Result<Option<serde_json::Value>, ProviderError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("{}{}", self.label, arguments));
        Ok(self.result.clone())
    }
}

/// Action that always fails.
pub struct FailingAction;

#[async_trait]
impl ActionProvider for FailingAction {
    async fn execute(
        &self,
        _arguments: &Arguments,
    ) -> Result<Option<serde_json::Value>, ProviderError> {
        Err(ProviderError::Protocol("relay did not answer".to_string()))
    }

    fn validate(&self, arguments: &Arguments) -> Result<(), ProviderError> {
        arguments.str_at(0).map(|_| ())
    }
}

/// Event source fired by hand from a test.
#[derive(Clone, Default)]
pub struct ManualSource {
    sinks: Arc<Mutex<Vec<EventSink>>>,
}

impl ManualSource {
    pub fn fire(&self) {
        for sink in self.sinks.lock().unwrap().iter() {
            sink.notify();
        }
    }

    pub fn registered(&self) -> usize {
        self.sinks.lock().unwrap().len()
    }
}

#[async_trait]
impl ConditionProvider for ManualSource {
    async fn check(&self, _arguments: &Arguments) -> Result<Signal, ProviderError> {
        Err(ProviderError::Unsupported("manual source cannot be polled"))
    }

    fn as_event_source(&self) -> Option<&dyn EventSource> {
        Some(self)
    }
}

impl EventSource for ManualSource {
    fn register(&self, sink: EventSink, _arguments: &Arguments) -> Result<(), ProviderError> {
        self.sinks.lock().unwrap().push(sink);
        Ok(())
    }
}

/// Formatted log output of the events emitted while installed.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Route the events of the current thread here until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let writer = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
