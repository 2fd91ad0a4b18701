use serde_json::{Map, Value};
use tracing::error;

use crate::pipeline::payload::Payload;
use crate::tlp::{ErrorLog, Level, LogMessage};

use super::{parse_timestamp, value_kind, value_to_string, Mapper, MappingError};

pub(crate) const UNDEFINED_LEVEL: &str = "UNDEFINED";
pub(crate) const DEFAULT_LOGGER: &str = "default";
pub(crate) const DEFAULT_THREAD: &str = "main";

/// Maps documents in the Logstash JSON layout (`@timestamp`, `message`,
/// `logger_name`, `thread_name`, `level`, `mdc`, `stack_trace`,
/// `exception_class`, `exception_message`).
#[derive(Debug, Clone)]
pub struct LogstashMapper {
    source: String,
}

impl LogstashMapper {
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into() }
    }

    fn map_document(&self, document: &Value) -> Result<LogMessage, MappingError> {
        let fields = document
            .as_object()
            .ok_or_else(|| MappingError::NotAnObject(value_kind(document)))?;
        let text = |key: &str| fields.get(key).and_then(value_to_string);

        let content = text("message").ok_or(MappingError::MissingField("message"))?;
        let time_stamp = match fields.get("@timestamp") {
            Some(Value::Null) | None => 0,
            Some(value) => parse_timestamp(value)?,
        };

        Ok(LogMessage {
            source: self.source.clone(),
            thread_name: text("thread_name").unwrap_or_else(|| DEFAULT_THREAD.to_string()),
            time_stamp,
            logger_name: text("logger_name").unwrap_or_else(|| DEFAULT_LOGGER.to_string()),
            level: Level::new(text("level").unwrap_or_else(|| UNDEFINED_LEVEL.to_string())),
            content,
            exception: map_exception(fields),
            context: fields.get("mdc").and_then(Value::as_object).cloned(),
        })
    }
}

fn map_exception(fields: &Map<String, Value>) -> Option<ErrorLog> {
    let text = |key: &str| fields.get(key).and_then(value_to_string);
    let stack_trace = text("stack_trace");
    let message = text("exception_message");
    if stack_trace.is_none() && message.is_none() {
        return None;
    }
    Some(ErrorLog {
        class_name: text("exception_class").unwrap_or_default(),
        message: message.unwrap_or_default(),
        stack_trace,
    })
}

impl Mapper for LogstashMapper {
    fn map(&self, input: Payload) -> Option<Payload> {
        let Payload::Document(document) = &input else {
            error!(source = %self.source, kind = input.kind(), "Could not map input data; expected a JSON document");
            return None;
        };
        match self.map_document(document) {
            Ok(record) => Some(Payload::Record(record)),
            Err(e) => {
                error!(source = %self.source, error = %e, "Could not map input data");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapper() -> LogstashMapper {
        LogstashMapper::new("log-stream-1")
    }

    fn record(payload: Option<Payload>) -> LogMessage {
        match payload {
            Some(Payload::Record(record)) => record,
            other => panic!("expected a record, got {:?}", other),
        }
    }

    #[test]
    fn test_maps_message_with_exception_and_mdc() {
        let input = json!({
            "@timestamp": "2023-05-29T13:21:30.122330935Z",
            "message": "This is a log message",
            "logger_name": "app.Application",
            "thread_name": "main",
            "level": "INFO",
            "mdc": { "requestID": "request-1234" },
            "stack_trace": "stacktrace",
            "exception_class": "java.lang.NullPointerException",
            "exception_message": "null"
        });

        let out = record(mapper().map(Payload::Document(input)));
        assert_eq!(out.source, "log-stream-1");
        assert_eq!(out.time_stamp, 1_685_366_490_122);
        assert_eq!(out.level, Level::new("INFO"));
        assert_eq!(out.logger_name, "app.Application");
        assert_eq!(out.thread_name, "main");
        assert_eq!(out.content, "This is a log message");
        assert_eq!(
            out.exception,
            Some(ErrorLog {
                class_name: "java.lang.NullPointerException".to_string(),
                message: "null".to_string(),
                stack_trace: Some("stacktrace".to_string()),
            })
        );
        assert_eq!(out.context, json!({ "requestID": "request-1234" }).as_object().cloned());
    }

    #[test]
    fn test_maps_plain_message_with_defaults() {
        let out = record(mapper().map(Payload::Document(json!({ "message": "hi" }))));
        assert_eq!(out.time_stamp, 0);
        assert_eq!(out.level.level_str, "UNDEFINED");
        assert_eq!(out.logger_name, "default");
        assert_eq!(out.thread_name, "main");
        assert!(out.exception.is_none());
        assert!(out.context.is_none());
        let wire = serde_json::to_value(&out).unwrap();
        assert!(wire.get("context").is_none());
    }

    #[test]
    fn test_missing_message_is_dropped() {
        let input = json!({ "@timestamp": "2023-05-29T13:21:30Z", "level": "WARN" });
        assert!(mapper().map(Payload::Document(input)).is_none());
    }

    #[test]
    fn test_non_object_is_dropped() {
        assert!(mapper().map(Payload::Document(json!([1, 2]))).is_none());
        assert!(mapper().map(Payload::Document(Value::Null)).is_none());
        assert!(mapper().map(Payload::Text("text".to_string())).is_none());
    }

    #[test]
    fn test_bad_timestamp_is_dropped() {
        let input = json!({ "@timestamp": "not a date", "message": "hi" });
        assert!(mapper().map(Payload::Document(input)).is_none());
    }
}
