// In-memory STT service behind the NATS transport seam
//
// Subscriptions are futures channels; publishes are recorded. The service can
// be told to answer a session stop with a final transcript, the way a real
// STT service flushes its last utterance.

use anyhow::{bail, Result};
use futures::channel::mpsc::{unbounded, UnboundedSender};
use futures::stream::StreamExt;
use live_dictation::nats::client::{SESSION_START_SUBJECT, SESSION_STOP_SUBJECT};
use live_dictation::nats::{
    PayloadStream, RecognitionErrorMessage, SessionControlMessage, SttTransport, TranscriptMessage,
};
use live_dictation::recognition::{RecognitionEvent, SessionEvent};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep, timeout};

#[derive(Default)]
struct Inner {
    transcripts: Mutex<Vec<UnboundedSender<Vec<u8>>>>,
    errors: Mutex<Vec<UnboundedSender<Vec<u8>>>>,
    published: Mutex<Vec<(String, SessionControlMessage)>>,
    stop_reply: Mutex<Option<String>>,
    fail_subscribe: AtomicBool,
}

#[derive(Clone, Default)]
pub struct FakeStt {
    inner: Arc<Inner>,
}

impl FakeStt {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service whose subscriptions always fail
    pub fn unreachable() -> Self {
        let stt = Self::default();
        stt.inner.fail_subscribe.store(true, Ordering::SeqCst);
        stt
    }

    /// Answer every session stop with this final transcript
    pub fn reply_to_stop_with(&self, text: &str) {
        *self.inner.stop_reply.lock().unwrap() = Some(text.to_string());
    }

    pub fn send_transcript(&self, session_id: &str, text: &str, partial: bool) {
        let msg = TranscriptMessage {
            session_id: session_id.to_string(),
            text: text.to_string(),
            partial,
            timestamp: "2025-10-27T14:30:05Z".to_string(),
            confidence: Some(0.9),
        };
        broadcast(&self.inner.transcripts, serde_json::to_vec(&msg).unwrap());
    }

    pub fn send_error(&self, session_id: &str, code: &str) {
        let msg = RecognitionErrorMessage {
            session_id: session_id.to_string(),
            error: code.to_string(),
            message: None,
        };
        broadcast(&self.inner.errors, serde_json::to_vec(&msg).unwrap());
    }

    /// End every open subscription, as a dropped connection would
    pub fn close(&self) {
        self.inner.transcripts.lock().unwrap().clear();
        self.inner.errors.lock().unwrap().clear();
    }

    pub fn published(&self) -> Vec<(String, SessionControlMessage)> {
        self.inner.published.lock().unwrap().clone()
    }

    pub fn stop_published(&self, session_id: &str) -> bool {
        self.published()
            .iter()
            .any(|(subject, msg)| subject == SESSION_STOP_SUBJECT && msg.session_id == session_id)
    }

    /// Wait until a session has subscribed and announced itself
    pub async fn wait_for_session(&self, session_id: &str) {
        for _ in 0..400 {
            let started = self
                .published()
                .iter()
                .any(|(subject, msg)| subject == SESSION_START_SUBJECT && msg.session_id == session_id);
            if started {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("session {} never started", session_id);
    }

    fn subscribe(&self, subscribers: &Mutex<Vec<UnboundedSender<Vec<u8>>>>) -> Result<PayloadStream> {
        if self.inner.fail_subscribe.load(Ordering::SeqCst) {
            bail!("connection refused");
        }
        let (tx, rx) = unbounded();
        subscribers.lock().unwrap().push(tx);
        Ok(rx.boxed())
    }
}

fn broadcast(subscribers: &Mutex<Vec<UnboundedSender<Vec<u8>>>>, payload: Vec<u8>) {
    for tx in subscribers.lock().unwrap().iter() {
        let _ = tx.unbounded_send(payload.clone());
    }
}

#[async_trait::async_trait]
impl SttTransport for FakeStt {
    async fn subscribe_transcripts(&self) -> Result<PayloadStream> {
        self.subscribe(&self.inner.transcripts)
    }

    async fn subscribe_errors(&self) -> Result<PayloadStream> {
        self.subscribe(&self.inner.errors)
    }

    async fn publish_session_start(&self, message: &SessionControlMessage) -> Result<()> {
        self.inner
            .published
            .lock()
            .unwrap()
            .push((SESSION_START_SUBJECT.to_string(), message.clone()));
        Ok(())
    }

    async fn publish_session_stop(&self, message: &SessionControlMessage) -> Result<()> {
        self.inner
            .published
            .lock()
            .unwrap()
            .push((SESSION_STOP_SUBJECT.to_string(), message.clone()));

        let reply = self.inner.stop_reply.lock().unwrap().clone();
        if let Some(text) = reply {
            self.send_transcript(&message.session_id, &text, false);
        }
        Ok(())
    }
}

/// Next event from a session sink, failing the test after two seconds
pub async fn next_event(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> RecognitionEvent {
    timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for a recognition event")
        .expect("event channel closed")
        .event
}

/// Every event up to and including `End`
pub async fn events_until_end(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<RecognitionEvent> {
    let mut events = Vec::new();
    loop {
        let event = next_event(rx).await;
        let done = event == RecognitionEvent::End;
        events.push(event);
        if done {
            return events;
        }
    }
}
