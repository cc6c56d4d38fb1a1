use super::messages::SessionControlMessage;
use anyhow::{Context, Result};
use async_nats::Client;
use tracing::info;

pub const SESSION_START_SUBJECT: &str = "stt.session.start";
pub const SESSION_STOP_SUBJECT: &str = "stt.session.stop";
pub const TRANSCRIPT_SUBJECT: &str = "stt.text.>";
pub const ERROR_SUBJECT: &str = "stt.error.>";

#[derive(Clone)]
pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    /// Ask the STT service to open a recognition session
    pub async fn publish_session_start(&self, message: &SessionControlMessage) -> Result<()> {
        self.publish_control(SESSION_START_SUBJECT, message).await
    }

    /// Ask the STT service to finish a recognition session
    pub async fn publish_session_stop(&self, message: &SessionControlMessage) -> Result<()> {
        self.publish_control(SESSION_STOP_SUBJECT, message).await
    }

    async fn publish_control(&self, subject: &str, message: &SessionControlMessage) -> Result<()> {
        let payload = serde_json::to_vec(message)?;

        self.client
            .publish(subject.to_string(), payload.into())
            .await
            .context("Failed to publish session control message")?;

        info!("Published {} for {}", subject, message.session_id);

        Ok(())
    }

    /// Subscribe to transcript messages
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        // Partial and final transcripts arrive on stt.text.partial and stt.text.final;
        // the recognizer filters by session_id in the payload
        self.subscribe(TRANSCRIPT_SUBJECT).await
    }

    /// Subscribe to recognition error messages
    pub async fn subscribe_errors(&self) -> Result<async_nats::Subscriber> {
        self.subscribe(ERROR_SUBJECT).await
    }

    async fn subscribe(&self, subject: &'static str) -> Result<async_nats::Subscriber> {
        info!("Subscribing to {}", subject);

        let subscriber = self
            .client
            .subscribe(subject)
            .await
            .with_context(|| format!("Failed to subscribe to {}", subject))?;

        Ok(subscriber)
    }
}
