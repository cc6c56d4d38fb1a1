use super::event::{RecognitionEvent, SessionEvent};
use crate::session::SessionConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Identity of one recognition session
///
/// Every created session gets a fresh id, so comparing ids is comparing
/// session instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Sender half handed to a recognizer; tags everything it emits with its session id
#[derive(Debug, Clone)]
pub struct EventSink {
    session: SessionId,
    tx: mpsc::UnboundedSender<SessionEvent>,
}

impl EventSink {
    pub fn new(session: SessionId, tx: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Deliver an event to the event loop.
    ///
    /// Events emitted after the loop has shut down are dropped.
    pub fn emit(&self, event: RecognitionEvent) {
        let _ = self.tx.send(SessionEvent {
            session: self.session,
            event,
        });
    }
}

/// One live recognition stream
///
/// All calls are fire-and-forget: their outcome is observed later through
/// the `EventSink` the stream was created with.
pub trait Recognizer: Send {
    /// Begin listening
    fn start(&mut self);

    /// Stop listening; results already captured may still be delivered, followed by `End`
    fn stop(&mut self);

    /// Stop immediately, discarding pending results
    fn abort(&mut self);

    /// Hand over the background task still running for this stream, if any
    ///
    /// Called after `stop()` so the owner can wait for the stream to release
    /// the capability before shutting down.
    fn take_task(&mut self) -> Option<JoinHandle<()>> {
        None
    }
}

/// Constructs recognizer streams for the host capability
pub trait RecognizerFactory: Send + Sync {
    fn create(&self, id: SessionId, config: &SessionConfig, sink: EventSink) -> Box<dyn Recognizer>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Whether the host can do speech recognition at all
#[derive(Clone)]
pub enum SpeechCapability {
    Available(Arc<dyn RecognizerFactory>),
    Unavailable,
}

impl SpeechCapability {
    pub fn available(factory: impl RecognizerFactory + 'static) -> Self {
        Self::Available(Arc::new(factory))
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Debug for SpeechCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(factory) => f.debug_tuple("Available").field(&factory.name()).finish(),
            Self::Unavailable => f.write_str("Unavailable"),
        }
    }
}

/// Facts about the host that influence how failures are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HostEnvironment {
    /// Whether the capability is reached over a secure transport
    pub secure_transport: bool,
}

impl HostEnvironment {
    pub fn new(secure_transport: bool) -> Self {
        Self { secure_transport }
    }

    /// Derive the environment from the capability endpoint URL
    pub fn for_endpoint(url: &str) -> Self {
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase())
            .unwrap_or_default();

        Self {
            secure_transport: matches!(scheme.as_str(), "tls" | "wss" | "https"),
        }
    }
}

/// Probes the host for a speech recognition capability
#[async_trait::async_trait]
pub trait CapabilityProvider: Send + Sync {
    /// Check availability; absence is reported as `SpeechCapability::Unavailable`
    async fn probe(&self) -> SpeechCapability;

    /// Environment facts for error classification
    fn environment(&self) -> HostEnvironment;
}
