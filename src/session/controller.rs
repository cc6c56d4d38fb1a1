use super::classifier::{ErrorClassifier, ErrorKind};
use super::config::SessionConfig;
use super::error::SessionError;
use super::stats::SessionSnapshot;
use super::transcript::TranscriptAccumulator;
use crate::recognition::{
    ErrorEvent, EventSink, HostEnvironment, RecognitionEvent, Recognizer, ResultEvent, SessionEvent,
    SessionId, SpeechCapability,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Externally visible controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Listening,
}

/// The live recognition stream and what is needed to identify it
struct ActiveSession {
    id: SessionId,
    recognizer: Box<dyn Recognizer>,
    started_at: DateTime<Utc>,
}

enum Phase {
    Idle,
    Listening(ActiveSession),
}

/// Owns the lifecycle of at most one live recognition session
///
/// Every callback arrives as a `SessionEvent` and is applied only if it comes
/// from the right session instance:
/// - results and errors must come from the session that owns the transcript
///   (the most recently started one), so a stopped session can still flush
///   its last final results but a superseded one cannot touch anything
/// - `End` must come from the live session, so a late `End` from a replaced
///   session never marks the new one as stopped
pub struct SessionController {
    /// Host recognition capability
    capability: SpeechCapability,

    /// Configuration for every new session
    config: SessionConfig,

    /// Host facts used to classify errors
    environment: HostEnvironment,

    /// Event loop inbox handed to each recognizer through its `EventSink`
    events: mpsc::UnboundedSender<SessionEvent>,

    /// Idle, or listening with the live session handle
    phase: Phase,

    /// Transcript built from result events
    transcript: TranscriptAccumulator,

    /// Latest user-facing error
    error: Option<String>,

    /// Session whose results and errors are accepted
    owner: Option<SessionId>,

    /// Start time of the owning session, for diagnostics
    owner_started_at: Option<DateTime<Utc>>,

    /// Tasks of stopped sessions that may still be flushing results
    draining: Vec<JoinHandle<()>>,
}

impl SessionController {
    pub fn new(
        capability: SpeechCapability,
        config: SessionConfig,
        environment: HostEnvironment,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            capability,
            config,
            environment,
            events,
            phase: Phase::Idle,
            transcript: TranscriptAccumulator::new(),
            error: None,
            owner: None,
            owner_started_at: None,
            draining: Vec::new(),
        }
    }

    /// Start a new recognition session
    ///
    /// A live session is stopped first. Fails with `UnsupportedCapability`
    /// (after recording the unsupported message) when the host cannot
    /// recognize speech; no session is created in that case.
    pub fn start(&mut self) -> Result<SessionId, SessionError> {
        let factory = match &self.capability {
            SpeechCapability::Available(factory) => Arc::clone(factory),
            SpeechCapability::Unavailable => {
                warn!("Speech recognition is not available, not starting a session");
                self.error = ErrorKind::UnsupportedCapability.message();
                return Err(SessionError::UnsupportedCapability);
            }
        };

        if self.is_recording() {
            info!("Replacing live session");
            self.stop();
        }

        self.error = None;
        self.transcript.seed_from_displayed();

        let id = SessionId::new();
        let sink = EventSink::new(id, self.events.clone());
        let mut recognizer = factory.create(id, &self.config, sink);
        let started_at = Utc::now();

        info!(
            session = %id,
            backend = factory.name(),
            language = %self.config.language,
            secure_transport = self.environment.secure_transport,
            "Starting recognition session"
        );

        self.owner = Some(id);
        self.owner_started_at = Some(started_at);
        recognizer.start();
        self.phase = Phase::Listening(ActiveSession {
            id,
            recognizer,
            started_at,
        });

        Ok(id)
    }

    /// Stop the live session, if any
    ///
    /// The recognizer may still deliver trailing results and its `End`
    /// afterwards; calling this while idle does nothing.
    pub fn stop(&mut self) {
        if let Phase::Listening(mut active) = std::mem::replace(&mut self.phase, Phase::Idle) {
            info!(session = %active.id, "Stopping recognition session");
            active.recognizer.stop();

            self.draining.retain(|task| !task.is_finished());
            if let Some(task) = active.recognizer.take_task() {
                self.draining.push(task);
            }
        }
    }

    /// Stop when listening, start otherwise
    pub fn toggle(&mut self) -> Result<(), SessionError> {
        if self.is_recording() {
            self.stop();
            Ok(())
        } else {
            self.start().map(|_| ())
        }
    }

    /// Release the capability before the owner goes away
    ///
    /// Returns the tasks of sessions that are still shutting down; the owner
    /// should wait for them so their final messages reach the capability.
    pub fn dispose(&mut self) -> Vec<JoinHandle<()>> {
        self.stop();
        std::mem::take(&mut self.draining)
    }

    /// Drop all transcript text
    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Apply a recognizer callback; returns false when it was rejected as stale
    pub fn handle_event(&mut self, event: SessionEvent) -> bool {
        match event.event {
            RecognitionEvent::Result(result) => self.on_result(event.session, &result),
            RecognitionEvent::Error(error) => self.on_error(event.session, &error),
            RecognitionEvent::End => self.on_end(event.session),
        }
    }

    fn on_result(&mut self, session: SessionId, result: &ResultEvent) -> bool {
        if self.owner != Some(session) {
            debug!(session = %session, "Ignoring result from superseded session");
            return false;
        }

        let displayed = self.transcript.apply(result);
        debug!(
            session = %session,
            result_index = result.result_index,
            slots = result.results.len(),
            chars = displayed.chars().count(),
            "Transcript updated"
        );
        true
    }

    fn on_error(&mut self, session: SessionId, error: &ErrorEvent) -> bool {
        if self.owner != Some(session) {
            debug!(session = %session, code = %error.error, "Ignoring error from superseded session");
            return false;
        }

        let elapsed_ms = self
            .owner_started_at
            .map(|started| Utc::now().signed_duration_since(started).num_milliseconds())
            .unwrap_or(0);

        let kind = ErrorClassifier::classify(&error.error, &self.environment);
        info!(
            session = %session,
            code = %error.error,
            message = error.message.as_deref().unwrap_or(""),
            elapsed_ms,
            "Recognition error"
        );

        if kind == (ErrorKind::TransientNetwork { secure: true }) {
            warn!(session = %session, "Network error over a secure transport, speech service unreachable");
        }

        if let Some(message) = kind.message() {
            self.error = Some(message);
        }
        true
    }

    fn on_end(&mut self, session: SessionId) -> bool {
        let matches_live = matches!(&self.phase, Phase::Listening(active) if active.id == session);
        debug!(session = %session, matches_live, "Recognition ended");

        if matches_live {
            self.phase = Phase::Idle;
            info!(session = %session, "Recognition session ended");
        }
        matches_live
    }

    pub fn state(&self) -> SessionState {
        match self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Listening(_) => SessionState::Listening,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.state() == SessionState::Listening
    }

    /// Id of the live session
    pub fn session_id(&self) -> Option<SessionId> {
        match &self.phase {
            Phase::Listening(active) => Some(active.id),
            Phase::Idle => None,
        }
    }

    pub fn transcript(&self) -> &str {
        self.transcript.displayed()
    }

    pub fn finalized(&self) -> &str {
        self.transcript.finalized()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn environment(&self) -> HostEnvironment {
        self.environment
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (session_id, started_at, elapsed_ms) = match &self.phase {
            Phase::Listening(active) => (
                Some(active.id.to_string()),
                Some(active.started_at),
                Some(
                    Utc::now()
                        .signed_duration_since(active.started_at)
                        .num_milliseconds(),
                ),
            ),
            Phase::Idle => (None, None, None),
        };

        SessionSnapshot {
            is_recording: self.is_recording(),
            transcript: self.transcript.displayed().to_string(),
            error: self.error.clone(),
            session_id,
            started_at,
            elapsed_ms,
        }
    }
}
