pub mod client;
pub mod messages;
pub mod recognizer;
pub mod transport;

pub use client::NatsClient;
pub use messages::{RecognitionErrorMessage, SessionControlMessage, TranscriptMessage};
pub use recognizer::{
    NatsProvider, NatsRecognizer, NatsRecognizerFactory, ResultAssembler, DEFAULT_DRAIN_TIMEOUT,
};
pub use transport::{PayloadStream, SttTransport};
