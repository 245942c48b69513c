use crate::transport::{EventSource, StatSink, TransportError};
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Msg};
use tracing::info;

/// Message stream from the pub/sub connection subscribed to the input channel.
pub struct RedisSource {
    messages: BoxStream<'static, Msg>,
}

/// Publishing half. Pub/sub connections cannot issue regular commands, so
/// publishing goes through a separate multiplexed connection.
pub struct RedisSink {
    connection: MultiplexedConnection,
}

/// Open both connections the engine needs against one Redis instance.
pub async fn connect(
    url: &str,
    input_channel: &str,
) -> Result<(RedisSource, RedisSink), TransportError> {
    let client =
        redis::Client::open(url).map_err(|e| TransportError::Connection(e.to_string()))?;

    let mut pubsub = client
        .get_async_pubsub()
        .await
        .map_err(|e| TransportError::Connection(e.to_string()))?;
    pubsub
        .subscribe(input_channel)
        .await
        .map_err(|e| TransportError::Subscribe(e.to_string()))?;

    let connection = client
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| TransportError::Connection(e.to_string()))?;

    info!(url = %url, input_channel = %input_channel, "Connected to Redis");

    Ok((
        RedisSource {
            messages: pubsub.into_on_message().boxed(),
        },
        RedisSink { connection },
    ))
}

#[async_trait]
impl EventSource for RedisSource {
    async fn next_event(&mut self) -> Option<Result<String, TransportError>> {
        let msg = self.messages.next().await?;
        Some(
            msg.get_payload::<String>()
                .map_err(|e| TransportError::Receive(e.to_string())),
        )
    }
}

#[async_trait]
impl StatSink for RedisSink {
    async fn send(&mut self, channel: &str, payload: String) -> Result<(), TransportError> {
        self.connection
            .publish::<_, _, ()>(channel, payload)
            .await
            .map_err(|e| TransportError::Publish(e.to_string()))
    }
}
