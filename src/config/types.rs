use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub transport: TransportConfig,
    #[serde(default)]
    pub aggregator: AggregatorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Redis connection string, e.g. redis://127.0.0.1:6379/
    pub url: String,

    #[serde(default = "default_input_channel")]
    pub input_channel: String,

    #[serde(default = "default_output_channel")]
    pub output_channel: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Tumbling window width; also the flush interval.
    #[serde(with = "humantime_serde", default = "default_window_size")]
    pub window_size: Duration,

    /// Upper bound on one inbound poll, so flush checks stay timely on a
    /// quiet channel.
    #[serde(with = "humantime_serde", default = "default_poll_timeout")]
    pub poll_timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            poll_timeout: default_poll_timeout(),
        }
    }
}

fn default_input_channel() -> String {
    "logs.ingest".to_string()
}

fn default_output_channel() -> String {
    "stats.update".to_string()
}

fn default_window_size() -> Duration {
    Duration::from_millis(1000)
}

fn default_poll_timeout() -> Duration {
    Duration::from_millis(100)
}
