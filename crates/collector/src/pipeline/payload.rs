use std::fmt;
use std::pin::Pin;

use bytes::Bytes;
use serde_json::Value;
use tokio_stream::Stream;

use crate::tlp::LogMessage;

/// One item travelling between pipeline stages.
///
/// Adjacent stages agree on the variant by configuration; a stage handed a
/// variant it does not understand logs and drops it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Raw bytes straight from a listener.
    Chunk(Bytes),
    /// Decoded text.
    Text(String),
    /// Parsed JSON document.
    Document(Value),
    /// Normalized log record.
    Record(LogMessage),
}

/// Listener output.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Bytes> + Send>>;

/// Parser output for a single input item.
pub type PayloadStream = Pin<Box<dyn Stream<Item = Payload> + Send>>;

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Chunk(_) => "chunk",
            Payload::Text(_) => "text",
            Payload::Document(_) => "document",
            Payload::Record(_) => "record",
        }
    }

    /// Single-line rendering: text as-is, structured values as compact JSON.
    pub fn to_line(&self) -> String {
        match self {
            Payload::Chunk(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Payload::Text(text) => text.clone(),
            Payload::Document(value) => value.to_string(),
            Payload::Record(record) => serde_json::to_string(record).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to serialize log record");
                String::new()
            }),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}
