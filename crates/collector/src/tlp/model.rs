//! Wire model of the log processor's ingest API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The normalized log record: one log event, ready to be published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMessage {
    /// Log stream name of the pipeline that produced the record.
    pub source: String,
    pub thread_name: String,
    /// Epoch milliseconds.
    pub time_stamp: i64,
    pub logger_name: String,
    pub level: Level,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<ErrorLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    #[serde(rename = "levelStr")]
    pub level_str: String,
}

impl Level {
    pub fn new(level: impl Into<String>) -> Self {
        Self { level_str: level.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLog {
    pub class_name: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}
