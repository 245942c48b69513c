use crate::event::{LogEvent, LogLevel};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unparseable timestamp '{0}'")]
    Timestamp(String),

    #[error("missing or empty service name")]
    Service,
}

/// Raw wire shape of an inbound message. `level` and `message` default to
/// empty when missing; `timestamp` and `service` are validated below.
#[derive(Deserialize)]
struct RawLogEvent {
    timestamp: String,
    #[serde(default)]
    level: String,
    #[serde(default)]
    service: String,
    #[serde(default)]
    message: String,
}

/// Decode one inbound payload into a validated event.
///
/// A failure here is non-fatal to the engine: the caller reports it and drops
/// the message. No event is ever partially admitted.
pub fn decode(payload: &str) -> Result<LogEvent, DecodeError> {
    let raw: RawLogEvent = serde_json::from_str(payload)?;

    if raw.service.is_empty() {
        return Err(DecodeError::Service);
    }

    let timestamp = parse_timestamp(&raw.timestamp)?;

    Ok(LogEvent {
        timestamp,
        level: LogLevel::from(raw.level),
        service: raw.service,
        message: raw.message,
    })
}

/// Parse an ISO-8601 timestamp, normalized to UTC.
///
/// Producers using `datetime.isoformat()` emit no UTC offset; naive
/// timestamps are taken as already being UTC.
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, DecodeError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    s.parse::<NaiveDateTime>()
        .map(|dt| dt.and_utc())
        .map_err(|_| DecodeError::Timestamp(s.to_string()))
}
