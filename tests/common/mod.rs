// Test double for the host speech recognition capability
//
// The factory hands out recognizers that only record what was called on them,
// and keeps every session's EventSink so tests can play the recognizer's part.

#![allow(dead_code)]

pub mod fake_stt;

use live_dictation::recognition::{
    ErrorEvent, EventSink, RecognitionEvent, RecognitionResult, Recognizer, RecognizerFactory,
    ResultEvent, SessionId,
};
use live_dictation::SessionConfig;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Created(SessionId, SessionConfig),
    Start(SessionId),
    Stop(SessionId),
    Abort(SessionId),
}

#[derive(Default)]
pub struct Host {
    pub calls: Mutex<Vec<Call>>,
    pub sinks: Mutex<Vec<EventSink>>,
}

impl Host {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Sink of the n-th created session
    pub fn sink(&self, n: usize) -> EventSink {
        self.sinks.lock().unwrap()[n].clone()
    }

    pub fn session_count(&self) -> usize {
        self.sinks.lock().unwrap().len()
    }
}

pub struct MockRecognizer {
    id: SessionId,
    host: Arc<Host>,
}

impl Recognizer for MockRecognizer {
    fn start(&mut self) {
        self.host.calls.lock().unwrap().push(Call::Start(self.id));
    }

    fn stop(&mut self) {
        self.host.calls.lock().unwrap().push(Call::Stop(self.id));
    }

    fn abort(&mut self) {
        self.host.calls.lock().unwrap().push(Call::Abort(self.id));
    }
}

pub struct MockFactory {
    pub host: Arc<Host>,
}

impl MockFactory {
    pub fn new() -> (Self, Arc<Host>) {
        let host = Arc::new(Host::default());
        (
            Self {
                host: Arc::clone(&host),
            },
            host,
        )
    }
}

impl RecognizerFactory for MockFactory {
    fn create(&self, id: SessionId, config: &SessionConfig, sink: EventSink) -> Box<dyn Recognizer> {
        self.host
            .calls
            .lock()
            .unwrap()
            .push(Call::Created(id, config.clone()));
        self.host.sinks.lock().unwrap().push(sink);

        Box::new(MockRecognizer {
            id,
            host: Arc::clone(&self.host),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}

pub fn final_slot(text: &str) -> RecognitionResult {
    RecognitionResult::final_text(text)
}

pub fn interim_slot(text: &str) -> RecognitionResult {
    RecognitionResult::interim_text(text)
}

pub fn results(result_index: usize, results: Vec<RecognitionResult>) -> RecognitionEvent {
    RecognitionEvent::Result(ResultEvent {
        result_index,
        results,
    })
}

pub fn error(code: &str) -> RecognitionEvent {
    RecognitionEvent::Error(ErrorEvent::new(code))
}
