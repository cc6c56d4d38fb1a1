use super::client::NatsClient;
use super::messages::SessionControlMessage;
use anyhow::Result;
use futures::stream::{BoxStream, StreamExt};

/// Raw message payloads from one subscription
pub type PayloadStream = BoxStream<'static, Vec<u8>>;

/// What a recognition session needs from the STT service connection
#[async_trait::async_trait]
pub trait SttTransport: Clone + Send + Sync + 'static {
    /// Partial and final transcripts for every session
    async fn subscribe_transcripts(&self) -> Result<PayloadStream>;

    /// Recognition errors for every session
    async fn subscribe_errors(&self) -> Result<PayloadStream>;

    async fn publish_session_start(&self, message: &SessionControlMessage) -> Result<()>;

    async fn publish_session_stop(&self, message: &SessionControlMessage) -> Result<()>;
}

#[async_trait::async_trait]
impl SttTransport for NatsClient {
    async fn subscribe_transcripts(&self) -> Result<PayloadStream> {
        let subscriber = NatsClient::subscribe_transcripts(self).await?;
        Ok(subscriber.map(|msg| msg.payload.to_vec()).boxed())
    }

    async fn subscribe_errors(&self) -> Result<PayloadStream> {
        let subscriber = NatsClient::subscribe_errors(self).await?;
        Ok(subscriber.map(|msg| msg.payload.to_vec()).boxed())
    }

    async fn publish_session_start(&self, message: &SessionControlMessage) -> Result<()> {
        NatsClient::publish_session_start(self, message).await
    }

    async fn publish_session_stop(&self, message: &SessionControlMessage) -> Result<()> {
        NatsClient::publish_session_stop(self, message).await
    }
}
