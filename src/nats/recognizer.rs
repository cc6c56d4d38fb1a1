use super::client::NatsClient;
use super::messages::{RecognitionErrorMessage, SessionControlMessage, TranscriptMessage};
use super::transport::{PayloadStream, SttTransport};
use crate::recognition::{
    CapabilityProvider, ErrorEvent, EventSink, HostEnvironment, RecognitionAlternative,
    RecognitionEvent, RecognitionResult, Recognizer, RecognizerFactory, ResultEvent, SessionId,
    SpeechCapability,
};
use crate::session::SessionConfig;
use chrono::Utc;
use futures::stream::StreamExt;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// How long a stopped session keeps listening for its last final transcript
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_millis(1500);

/// Probes a NATS-hosted STT service
pub struct NatsProvider {
    url: String,
    environment: HostEnvironment,
    drain_timeout: Duration,
}

impl NatsProvider {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let environment = HostEnvironment::for_endpoint(&url);
        Self {
            url,
            environment,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    /// Override the environment derived from the URL scheme
    pub fn with_environment(mut self, environment: HostEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }
}

#[async_trait::async_trait]
impl CapabilityProvider for NatsProvider {
    async fn probe(&self) -> SpeechCapability {
        match NatsClient::connect(&self.url).await {
            Ok(client) => SpeechCapability::available(
                NatsRecognizerFactory::new(client).with_drain_timeout(self.drain_timeout),
            ),
            Err(e) => {
                warn!("Speech recognition unavailable ({}): {:#}", self.url, e);
                SpeechCapability::Unavailable
            }
        }
    }

    fn environment(&self) -> HostEnvironment {
        self.environment
    }
}

/// Creates `NatsRecognizer` streams sharing one connection
pub struct NatsRecognizerFactory<T = NatsClient> {
    transport: T,
    drain_timeout: Duration,
}

impl<T: SttTransport> NatsRecognizerFactory<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        }
    }

    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }
}

impl<T: SttTransport> RecognizerFactory for NatsRecognizerFactory<T> {
    fn create(&self, id: SessionId, config: &SessionConfig, sink: EventSink) -> Box<dyn Recognizer> {
        Box::new(NatsRecognizer {
            transport: self.transport.clone(),
            id,
            config: config.clone(),
            sink,
            drain_timeout: self.drain_timeout,
            stop_tx: None,
            task: None,
        })
    }

    fn name(&self) -> &str {
        "nats"
    }
}

/// One recognition session on the STT service
///
/// The session runs in its own task which reports back through the
/// `EventSink` and always finishes with `End`.
pub struct NatsRecognizer<T = NatsClient> {
    transport: T,
    id: SessionId,
    config: SessionConfig,
    sink: EventSink,
    drain_timeout: Duration,
    stop_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl<T: SttTransport> Recognizer for NatsRecognizer<T> {
    fn start(&mut self) {
        if self.task.is_some() {
            warn!("Recognizer {} already started", self.id);
            return;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let session = SessionTask {
            transport: self.transport.clone(),
            session_id: self.id.to_string(),
            config: self.config.clone(),
            sink: self.sink.clone(),
            drain_timeout: self.drain_timeout,
            assembler: ResultAssembler::new(),
        };

        self.stop_tx = Some(stop_tx);
        self.task = Some(tokio::spawn(session.run(stop_rx)));
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }

    // The controller never aborts; this completes the recognizer contract
    // for hosts that need to discard a session outright.
    fn abort(&mut self) {
        self.stop_tx = None;
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                task.abort();
                self.sink.emit(RecognitionEvent::Error(ErrorEvent::new("aborted")));
                self.sink.emit(RecognitionEvent::End);
            }
        }
    }

    fn take_task(&mut self) -> Option<JoinHandle<()>> {
        self.task.take()
    }
}

/// Why the listening loop exited
enum Exit {
    Stopped,
    Completed,
    Disconnected,
}

/// What a transcript payload amounted to
#[derive(Debug, PartialEq, Eq)]
enum Received {
    Ignored,
    Interim,
    Final,
}

struct SessionTask<T> {
    transport: T,
    session_id: String,
    config: SessionConfig,
    sink: EventSink,
    drain_timeout: Duration,
    assembler: ResultAssembler,
}

impl<T: SttTransport> SessionTask<T> {
    async fn run(mut self, mut stop_rx: oneshot::Receiver<()>) {
        let control = SessionControlMessage {
            session_id: self.session_id.clone(),
            language: self.config.language.clone(),
            continuous: self.config.continuous,
            interim_results: self.config.interim_results,
            timestamp: Utc::now().to_rfc3339(),
        };

        // Subscribe before announcing the session so no early transcript is missed
        let subscriptions = async {
            let transcripts = self.transport.subscribe_transcripts().await?;
            let errors = self.transport.subscribe_errors().await?;
            self.transport.publish_session_start(&control).await?;
            anyhow::Ok((transcripts, errors))
        };

        let (mut transcripts, mut errors) = match subscriptions.await {
            Ok(subs) => subs,
            Err(e) => {
                error!("Failed to open recognition session {}: {:#}", self.session_id, e);
                self.sink.emit(RecognitionEvent::Error(
                    ErrorEvent::new("network").with_message(format!("{:#}", e)),
                ));
                self.sink.emit(RecognitionEvent::End);
                return;
            }
        };

        info!("Recognition session {} listening", self.session_id);

        let exit = loop {
            tokio::select! {
                // Fires on an explicit stop and when the recognizer is dropped
                _ = &mut stop_rx => break Exit::Stopped,
                payload = transcripts.next() => {
                    let Some(payload) = payload else { break Exit::Disconnected };

                    if self.on_transcript(&payload) == Received::Final && !self.config.continuous {
                        break Exit::Completed;
                    }
                }
                payload = errors.next() => {
                    let Some(payload) = payload else { break Exit::Disconnected };
                    self.on_error(&payload);
                }
            }
        };

        match exit {
            Exit::Disconnected => {
                warn!("Transcript stream closed for {}", self.session_id);
                self.sink.emit(RecognitionEvent::Error(
                    ErrorEvent::new("network").with_message("subscription closed"),
                ));
            }
            Exit::Completed => self.publish_stop(control).await,
            Exit::Stopped => {
                self.publish_stop(control).await;
                self.drain(&mut transcripts, &mut errors).await;
            }
        }

        info!(
            "Recognition session {} ended ({} final results)",
            self.session_id,
            self.assembler.settled_count()
        );
        self.sink.emit(RecognitionEvent::End);
    }

    async fn publish_stop(&self, control: SessionControlMessage) {
        let stop = SessionControlMessage {
            timestamp: Utc::now().to_rfc3339(),
            ..control
        };
        if let Err(e) = self.transport.publish_session_stop(&stop).await {
            warn!("Failed to announce end of session {}: {:#}", self.session_id, e);
        }
    }

    /// Keep delivering results the service flushes after a stop, until its
    /// final transcript arrives or the drain timeout runs out
    async fn drain(&mut self, transcripts: &mut PayloadStream, errors: &mut PayloadStream) {
        let drained = timeout(self.drain_timeout, async {
            loop {
                tokio::select! {
                    payload = transcripts.next() => match payload {
                        Some(payload) => {
                            if self.on_transcript(&payload) == Received::Final {
                                break;
                            }
                        }
                        None => break,
                    },
                    payload = errors.next() => match payload {
                        Some(payload) => self.on_error(&payload),
                        None => break,
                    },
                }
            }
        })
        .await;

        if drained.is_err() {
            debug!(
                "No final transcript for {} within {:?}",
                self.session_id, self.drain_timeout
            );
        }
    }

    fn on_transcript(&mut self, payload: &[u8]) -> Received {
        let transcript = match serde_json::from_slice::<TranscriptMessage>(payload) {
            Ok(transcript) => transcript,
            Err(e) => {
                warn!("Failed to parse transcript message: {}", e);
                return Received::Ignored;
            }
        };

        if transcript.session_id != self.session_id {
            return Received::Ignored;
        }
        if transcript.partial && !self.config.interim_results {
            return Received::Ignored;
        }

        let event = self.assembler.push(&transcript);
        self.sink.emit(RecognitionEvent::Result(event));

        if transcript.partial {
            Received::Interim
        } else {
            Received::Final
        }
    }

    fn on_error(&self, payload: &[u8]) {
        match serde_json::from_slice::<RecognitionErrorMessage>(payload) {
            Ok(err) if err.session_id == self.session_id => {
                self.sink.emit(RecognitionEvent::Error(ErrorEvent {
                    error: err.error,
                    message: err.message,
                }));
            }
            Ok(_) => {}
            Err(e) => warn!("Failed to parse recognition error message: {}", e),
        }
    }
}

/// Turns a flat transcript stream into result events
///
/// Each message touches exactly one slot: a partial revises the open slot,
/// a final settles it. Settled slots were already delivered and are never
/// re-sent, so every event is a one-slot window (`result_index` 0) and a long
/// session costs the same per message as a short one.
#[derive(Debug, Default)]
pub struct ResultAssembler {
    settled: usize,
}

impl ResultAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: &TranscriptMessage) -> ResultEvent {
        let slot = RecognitionResult {
            alternatives: vec![RecognitionAlternative {
                transcript: message.text.clone(),
                confidence: message.confidence,
            }],
            is_final: !message.partial,
        };

        if slot.is_final {
            self.settled += 1;
        }

        ResultEvent {
            result_index: 0,
            results: vec![slot],
        }
    }

    /// Number of final results delivered so far
    pub fn settled_count(&self) -> usize {
        self.settled
    }
}
