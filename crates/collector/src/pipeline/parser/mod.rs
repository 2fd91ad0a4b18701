//! Parsers: transform one item into zero or more items.

pub mod byte_array;
pub mod joining_json;

pub use byte_array::ByteArrayParser;
pub use joining_json::JoiningJsonParser;

use super::payload::{Payload, PayloadStream};

pub trait Parser: Send + Sync {
    /// Parse one input item. The returned stream may be empty, which drops
    /// the input, or yield several items.
    fn parse(&self, input: Payload) -> PayloadStream;
}

pub(crate) fn nothing() -> PayloadStream {
    Box::pin(tokio_stream::empty())
}
