//! Mappers: turn a parsed item into a normalized log record, or reject it.

pub mod custom;
pub mod identity;
pub mod logstash;

pub use custom::CustomMapper;
pub use identity::IdentityMapper;
pub use logstash::LogstashMapper;

use chrono::{DateTime, NaiveDateTime};
use serde_json::Value;
use thiserror::Error;

use super::payload::Payload;

#[derive(Error, Debug, PartialEq)]
pub enum MappingError {
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Unparseable timestamp: {0}")]
    BadTimestamp(String),
    #[error("Invalid path expression '{0}'")]
    InvalidPath(String),
}

pub trait Mapper: Send + Sync {
    /// `None` drops the item; mapping failures are logged, never raised.
    fn map(&self, input: Payload) -> Option<Payload>;
}

/// Epoch milliseconds from an RFC 3339 string, a zone-less ISO timestamp
/// (read as UTC), or a number already in milliseconds.
pub(crate) fn parse_timestamp(value: &Value) -> Result<i64, MappingError> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .ok_or_else(|| MappingError::BadTimestamp(n.to_string())),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.timestamp_millis())
            .or_else(|_| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .map(|dt| dt.and_utc().timestamp_millis())
            })
            .map_err(|_| MappingError::BadTimestamp(s.clone())),
        other => Err(MappingError::BadTimestamp(other.to_string())),
    }
}

/// String form of a JSON value. Strings are taken verbatim, null counts as absent.
pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_timestamp_rfc3339_truncates_to_millis() {
        let ts = parse_timestamp(&json!("2023-05-29T13:21:30.122330935Z")).unwrap();
        assert_eq!(ts, 1_685_366_490_122);
    }

    #[test]
    fn test_parse_timestamp_with_offset() {
        let ts = parse_timestamp(&json!("2023-05-29T15:21:30+02:00")).unwrap();
        assert_eq!(ts, 1_685_366_490_000);
    }

    #[test]
    fn test_parse_timestamp_without_zone_is_utc() {
        let ts = parse_timestamp(&json!("2023-05-29T13:21:30.500")).unwrap();
        assert_eq!(ts, 1_685_366_490_500);
    }

    #[test]
    fn test_parse_timestamp_number_is_millis() {
        assert_eq!(parse_timestamp(&json!(1_685_366_490_122i64)).unwrap(), 1_685_366_490_122);
    }

    #[test]
    fn test_parse_timestamp_garbage() {
        assert!(matches!(parse_timestamp(&json!("yesterday")), Err(MappingError::BadTimestamp(_))));
        assert!(matches!(parse_timestamp(&json!(true)), Err(MappingError::BadTimestamp(_))));
    }

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!("x")), Some("x".to_string()));
        assert_eq!(value_to_string(&json!(42)), Some("42".to_string()));
        assert_eq!(value_to_string(&Value::Null), None);
    }
}
