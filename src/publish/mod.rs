use crate::aggregator::WindowStat;
use crate::transport::{StatSink, TransportError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to serialize stats: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Serializes computed window statistics and emits them on the output channel
/// as a single JSON list per flush cycle.
///
/// Delivery is at-most-once: a failed publish is reported to the caller and
/// the statistics for that cycle are lost. Nothing is buffered across cycles.
pub struct StatPublisher<S> {
    sink: S,
    channel: String,
}

impl<S: StatSink> StatPublisher<S> {
    pub fn new(sink: S, channel: String) -> Self {
        Self { sink, channel }
    }

    pub async fn publish(&mut self, stats: &[WindowStat]) -> Result<(), PublishError> {
        if stats.is_empty() {
            return Ok(());
        }

        let payload = serde_json::to_string(stats)?;
        self.sink.send(&self.channel, payload).await?;

        debug!(
            windows = stats.len(),
            channel = %self.channel,
            "Published window stats"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<(String, String)>,
        fail: bool,
    }

    #[async_trait]
    impl StatSink for RecordingSink {
        async fn send(&mut self, channel: &str, payload: String) -> Result<(), TransportError> {
            if self.fail {
                return Err(TransportError::Publish("connection reset".to_string()));
            }
            self.sent.push((channel.to_string(), payload));
            Ok(())
        }
    }

    fn make_stat(start_millis: i64) -> WindowStat {
        WindowStat {
            window_start: DateTime::from_timestamp_millis(start_millis).unwrap(),
            window_end: DateTime::from_timestamp_millis(start_millis + 1000).unwrap(),
            total_count: 4,
            error_count: 1,
            top_service: "auth-service".to_string(),
        }
    }

    #[tokio::test]
    async fn test_empty_stats_publish_nothing() {
        let mut publisher = StatPublisher::new(RecordingSink::default(), "stats.update".into());
        publisher.publish(&[]).await.unwrap();
        assert!(publisher.sink.sent.is_empty());
    }

    #[tokio::test]
    async fn test_publish_wire_shape() {
        let mut publisher = StatPublisher::new(RecordingSink::default(), "stats.update".into());
        publisher.publish(&[make_stat(0)]).await.unwrap();

        let (channel, payload) = &publisher.sink.sent[0];
        assert_eq!(channel, "stats.update");

        let parsed: serde_json::Value = serde_json::from_str(payload).unwrap();
        let list = parsed.as_array().unwrap();
        assert_eq!(list.len(), 1);

        let record = &list[0];
        assert_eq!(record["total_count"], 4);
        assert_eq!(record["error_count"], 1);
        assert_eq!(record["top_service"], "auth-service");

        // Window bounds go out as ISO-8601 strings in UTC.
        let start = record["window_start"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(start).is_ok());
        assert!(start.ends_with('Z'));
        assert!(DateTime::parse_from_rfc3339(record["window_end"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_publish_failure_surfaces_transport_error() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut publisher = StatPublisher::new(sink, "stats.update".into());
        let result = publisher.publish(&[make_stat(0)]).await;
        assert!(matches!(result, Err(PublishError::Transport(_))));
    }
}
