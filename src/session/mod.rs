//! Dictation session management
//!
//! This module provides the `SessionController` that manages:
//! - The lifecycle of at most one live recognition session
//! - Merging final and interim results into one growing transcript
//! - Classifying recognizer failures into user-facing messages
//! - Rejecting late callbacks from superseded sessions

mod classifier;
mod config;
mod controller;
mod error;
mod stats;
mod transcript;

pub use classifier::{
    ErrorClassifier, ErrorKind, INSECURE_TRANSPORT_MESSAGE, NETWORK_MESSAGE, UNSUPPORTED_MESSAGE,
};
pub use config::SessionConfig;
pub use controller::{SessionController, SessionState};
pub use error::SessionError;
pub use stats::SessionSnapshot;
pub use transcript::TranscriptAccumulator;
