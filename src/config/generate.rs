use std::path::PathBuf;

/// Commented sample config written by `logwind config init`.
pub const SAMPLE_CONFIG: &str = "\
# logwind configuration
#
# Values support $env{VAR_NAME} expansion, e.g. url: $env{REDIS_URL}

transport:
  # Redis connection string (subscribe + publish)
  url: redis://127.0.0.1:6379/

  # Channel carrying raw log events
  input_channel: logs.ingest

  # Channel to publish window statistics on
  output_channel: stats.update

aggregator:
  # Tumbling window width; also the flush interval
  window_size: 1s

  # Bounded wait for one inbound poll
  poll_timeout: 100ms
";

/// Default location for a user-level config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/logwind/config.yml"))
}
