pub mod decode;

pub use decode::{decode, DecodeError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log event.
///
/// Unrecognized levels are preserved verbatim rather than rejected; the
/// statistics only distinguish `Error` from everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
    Other(String),
}

impl LogLevel {
    pub fn is_error(&self) -> bool {
        matches!(self, LogLevel::Error)
    }

    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
            LogLevel::Other(s) => s,
        }
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        // Python's logging module emits "WARNING"; treat it as WARN.
        match s.to_ascii_uppercase().as_str() {
            "INFO" => LogLevel::Info,
            "WARN" | "WARNING" => LogLevel::Warn,
            "ERROR" => LogLevel::Error,
            "DEBUG" => LogLevel::Debug,
            _ => LogLevel::Other(s),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

/// One decoded log line. Immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub service: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_known_strings() {
        assert_eq!(LogLevel::from("INFO".to_string()), LogLevel::Info);
        assert_eq!(LogLevel::from("warn".to_string()), LogLevel::Warn);
        assert_eq!(LogLevel::from("WARNING".to_string()), LogLevel::Warn);
        assert_eq!(LogLevel::from("Error".to_string()), LogLevel::Error);
        assert_eq!(LogLevel::from("debug".to_string()), LogLevel::Debug);
    }

    #[test]
    fn test_level_preserves_unknown_verbatim() {
        let level = LogLevel::from("TRACE5".to_string());
        assert_eq!(level, LogLevel::Other("TRACE5".to_string()));
        assert_eq!(level.as_str(), "TRACE5");
    }

    #[test]
    fn test_only_error_counts_as_error() {
        assert!(LogLevel::Error.is_error());
        assert!(!LogLevel::Info.is_error());
        assert!(!LogLevel::Warn.is_error());
        assert!(!LogLevel::Other("FATAL".to_string()).is_error());
    }
}
