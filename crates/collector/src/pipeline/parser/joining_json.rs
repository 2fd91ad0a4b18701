use std::sync::Mutex;

use tracing::warn;

use crate::pipeline::payload::{Payload, PayloadStream};

use super::{nothing, Parser};

const LINE_TERMINATOR: char = '\n';

/// Joins text fragments into newline-terminated units and parses each line
/// as a JSON document.
///
/// Holds a private buffer of pending fragments, so every pipeline needs its
/// own instance. Sharing one between streams would interleave their
/// partial lines.
#[derive(Debug, Default)]
pub struct JoiningJsonParser {
    buffer: Mutex<Vec<String>>,
}

impl JoiningJsonParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer `fragment`; once it completes a line, flush every buffered
    /// line that parses as JSON.
    fn push(&self, fragment: String) -> Vec<serde_json::Value> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        let terminated = fragment.ends_with(LINE_TERMINATOR);
        buffer.push(fragment);
        if !terminated {
            return Vec::new();
        }

        let joined = buffer.concat();
        buffer.clear();
        drop(buffer);

        joined
            .trim()
            .split(LINE_TERMINATOR)
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str(line) {
                Ok(document) => Some(document),
                Err(e) => {
                    warn!(error = %e, "Log message could not be parsed as JSON");
                    None
                }
            })
            .collect()
    }

    pub fn pending_fragments(&self) -> usize {
        self.buffer.lock().map(|b| b.len()).unwrap_or_default()
    }
}

impl Parser for JoiningJsonParser {
    fn parse(&self, input: Payload) -> PayloadStream {
        let fragment = match input {
            Payload::Text(text) => text,
            other => {
                warn!(kind = other.kind(), "Joining JSON parser expects text");
                return nothing();
            }
        };
        let documents = self.push(fragment);
        if documents.is_empty() {
            return nothing();
        }
        Box::pin(tokio_stream::iter(documents.into_iter().map(Payload::Document)))
    }
}
