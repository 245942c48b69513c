use super::types::Config;
use crate::config::expand_env_vars;
use regex::Regex;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML in '{path}': {source}")]
    YamlParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("validation failed:\n{}", .0.join("\n"))]
    ValidationList(Vec<String>),

    #[error("validation failed: {0}")]
    Validation(String),
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    use std::io::Read;

    let mut file = File::open(path).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open config file '{}': {}", path.display(), e),
        ))
    })?;

    let mut yaml_string = String::new();
    file.read_to_string(&mut yaml_string).map_err(|e| {
        ConfigError::Io(std::io::Error::new(
            e.kind(),
            format!("failed to read config file '{}': {}", path.display(), e),
        ))
    })?;

    // Expand environment variables in the YAML string before parsing
    let yaml_string = expand_env_vars(&yaml_string);

    check_unexpanded_vars(&yaml_string)?;

    let config: Config = serde_yaml::from_str(&yaml_string).map_err(|e| ConfigError::YamlParse {
        path: path.display().to_string(),
        source: e,
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Checks for unexpanded environment variables and returns a helpful error
fn check_unexpanded_vars(yaml_string: &str) -> Result<(), ConfigError> {
    let re = Regex::new(r"\$env\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    let mut unexpanded_vars: Vec<String> = re
        .captures_iter(yaml_string)
        .map(|cap| cap.get(1).unwrap().as_str().to_string())
        .collect();

    if unexpanded_vars.is_empty() {
        return Ok(());
    }

    unexpanded_vars.sort();
    unexpanded_vars.dedup();

    Err(ConfigError::Validation(format!(
        "Environment variables are not set: {}\n\
         \n\
         To fix this, either:\n\
         1. Set the environment variables (e.g., export REDIS_URL=redis://127.0.0.1:6379/)\n\
         2. Replace the variables in the config file with actual values",
        unexpanded_vars.join(", ")
    )))
}

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if config.transport.url.is_empty() {
        errors.push("transport.url must not be empty".to_string());
    }
    if config.transport.input_channel.is_empty() {
        errors.push("transport.input_channel must not be empty".to_string());
    }
    if config.transport.output_channel.is_empty() {
        errors.push("transport.output_channel must not be empty".to_string());
    }
    if !config.transport.input_channel.is_empty()
        && config.transport.input_channel == config.transport.output_channel
    {
        errors.push(format!(
            "transport.input_channel and transport.output_channel must differ (both are '{}')",
            config.transport.input_channel
        ));
    }

    if config.aggregator.window_size.is_zero() {
        errors.push("aggregator.window_size must be greater than zero".to_string());
    }
    if config.aggregator.poll_timeout.is_zero() {
        errors.push("aggregator.poll_timeout must be greater than zero".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationList(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let file = write_config("transport:\n  url: redis://127.0.0.1:6379/\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.transport.url, "redis://127.0.0.1:6379/");
        assert_eq!(config.transport.input_channel, "logs.ingest");
        assert_eq!(config.transport.output_channel, "stats.update");
        assert_eq!(config.aggregator.window_size, Duration::from_millis(1000));
        assert_eq!(config.aggregator.poll_timeout, Duration::from_millis(100));
    }

    #[test]
    fn test_full_config_overrides_defaults() {
        let file = write_config(
            "transport:\n\
             \x20 url: redis://example:6380/\n\
             \x20 input_channel: raw.logs\n\
             \x20 output_channel: agg.stats\n\
             aggregator:\n\
             \x20 window_size: 5s\n\
             \x20 poll_timeout: 250ms\n",
        );
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.transport.input_channel, "raw.logs");
        assert_eq!(config.transport.output_channel, "agg.stats");
        assert_eq!(config.aggregator.window_size, Duration::from_secs(5));
        assert_eq!(config.aggregator.poll_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_env_var_expansion_in_url() {
        std::env::set_var("LOGWIND_PARSE_TEST_HOST", "redis-host");
        let file = write_config("transport:\n  url: redis://$env{LOGWIND_PARSE_TEST_HOST}:6379/\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.transport.url, "redis://redis-host:6379/");
        std::env::remove_var("LOGWIND_PARSE_TEST_HOST");
    }

    #[test]
    fn test_unexpanded_env_var_is_an_error() {
        let file = write_config("transport:\n  url: redis://$env{LOGWIND_UNSET_HOST}:6379/\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_url_rejected() {
        let file = write_config("transport:\n  url: \"\"\n");
        match load_config(file.path()) {
            Err(ConfigError::ValidationList(errors)) => {
                assert!(errors.iter().any(|e| e.contains("transport.url")));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_same_channels_rejected() {
        let file = write_config(
            "transport:\n\
             \x20 url: redis://127.0.0.1:6379/\n\
             \x20 input_channel: logs.ingest\n\
             \x20 output_channel: logs.ingest\n",
        );
        match load_config(file.path()) {
            Err(ConfigError::ValidationList(errors)) => {
                assert!(errors.iter().any(|e| e.contains("must differ")));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_window_rejected() {
        let file = write_config(
            "transport:\n\
             \x20 url: redis://127.0.0.1:6379/\n\
             aggregator:\n\
             \x20 window_size: 0s\n",
        );
        match load_config(file.path()) {
            Err(ConfigError::ValidationList(errors)) => {
                assert!(errors.iter().any(|e| e.contains("window_size")));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_is_parse_error_with_file_context() {
        let file = write_config("transport: [not, a, mapping\n");
        match load_config(file.path()) {
            Err(e @ ConfigError::YamlParse { .. }) => {
                assert!(e.to_string().contains(&file.path().display().to_string()));
            }
            other => panic!("expected YAML parse failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/logwind.yml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
