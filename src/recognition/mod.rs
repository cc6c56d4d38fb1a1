//! Host speech-recognition capability boundary
//!
//! The controller never talks to a recognition engine directly. It is handed a
//! `SpeechCapability` that is either available (a factory for live recognizer
//! streams) or unavailable, and it receives everything the stream reports as
//! `SessionEvent`s tagged with the id of the session that produced them.

mod capability;
mod event;

pub use capability::{
    CapabilityProvider, EventSink, HostEnvironment, Recognizer, RecognizerFactory, SessionId,
    SpeechCapability,
};
pub use event::{
    ErrorEvent, RecognitionAlternative, RecognitionEvent, RecognitionResult, ResultEvent,
    SessionEvent,
};
