pub mod redis;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("subscribe failed: {0}")]
    Subscribe(String),

    #[error("receive failed: {0}")]
    Receive(String),

    #[error("publish failed: {0}")]
    Publish(String),
}

/// Inbound side of the pub/sub transport.
///
/// `next_event` resolves with the next raw payload, an error if the
/// connection breaks, or `None` once the stream has ended. Reconnection is
/// the supervisor's concern, not the engine's.
#[async_trait]
pub trait EventSource: Send {
    async fn next_event(&mut self) -> Option<Result<String, TransportError>>;
}

/// Outbound side of the pub/sub transport.
#[async_trait]
pub trait StatSink: Send {
    async fn send(&mut self, channel: &str, payload: String) -> Result<(), TransportError>;
}
