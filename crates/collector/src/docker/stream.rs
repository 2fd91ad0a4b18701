use std::pin::Pin;

use bytes::Bytes;
use tokio_stream::Stream;

use crate::docker::client::DockerError;

/// Raw log bytes from the daemon, one item per transport data event.
pub type RawLogStream = Pin<Box<dyn Stream<Item = Result<Bytes, DockerError>> + Send>>;

pub struct LogStreamRequest {
    pub container_id: String,
    pub since: i32, // Unix seconds; bollard v0.20 takes i32
}

/// Resume cursor for a reconnecting log read.
///
/// Rewinds one poll interval so lines written while disconnected are not
/// missed; the overlap is re-delivered downstream.
pub fn since_cursor(now_ms: i64, rewind_ms: u64) -> i32 {
    let rewind = i64::try_from(rewind_ms).unwrap_or(i64::MAX);
    let secs = now_ms.saturating_sub(rewind).div_euclid(1000);
    if secs > i32::MAX as i64 {
        tracing::warn!(since = secs, "Timestamp exceeds i32 range, clamping to i32::MAX");
    }
    secs.clamp(0, i32::MAX as i64) as i32
}
