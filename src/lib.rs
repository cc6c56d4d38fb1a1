pub mod config;
pub mod http;
pub mod nats;
pub mod recognition;
pub mod runtime;
pub mod session;

pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::{NatsClient, NatsProvider, NatsRecognizerFactory, TranscriptMessage};
pub use recognition::{
    CapabilityProvider, EventSink, HostEnvironment, RecognitionEvent, Recognizer,
    RecognizerFactory, SessionEvent, SessionId, SpeechCapability,
};
pub use runtime::{DictationHandle, DictationRuntime};
pub use session::{
    ErrorClassifier, ErrorKind, SessionConfig, SessionController, SessionError, SessionSnapshot,
    SessionState, TranscriptAccumulator,
};
