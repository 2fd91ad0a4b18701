use tracing::warn;

use crate::pipeline::payload::{Payload, PayloadStream};

use super::{nothing, Parser};

/// Length of the multiplexing header Docker prepends to each frame of a
/// non-TTY log stream.
pub const STDOUT_HEADER_LEN: usize = 8;

/// Decodes a raw chunk as UTF-8 text.
///
/// Stateless; a single instance is shared by every pipeline.
#[derive(Debug, Clone, Default)]
pub struct ByteArrayParser {
    strip_header: bool,
}

impl ByteArrayParser {
    pub fn new(strip_header: bool) -> Self {
        Self { strip_header }
    }

    fn decode(&self, chunk: &[u8]) -> Option<String> {
        let body = if self.strip_header {
            // header-only or short frames carry no text
            chunk.get(STDOUT_HEADER_LEN..).filter(|b| !b.is_empty())?
        } else {
            chunk
        };
        match std::str::from_utf8(body) {
            Ok(text) => Some(text.to_string()),
            Err(e) => {
                warn!(error = %e, len = chunk.len(), "Log message could not be decoded as UTF-8");
                None
            }
        }
    }
}

impl Parser for ByteArrayParser {
    fn parse(&self, input: Payload) -> PayloadStream {
        let chunk = match input {
            Payload::Chunk(chunk) => chunk,
            other => {
                warn!(kind = other.kind(), "Byte array parser expects raw chunks");
                return nothing();
            }
        };
        match self.decode(&chunk) {
            Some(text) => Box::pin(tokio_stream::once(Payload::Text(text))),
            None => nothing(),
        }
    }
}
