//! Listeners: sources of raw byte chunks.

pub mod docker;
pub mod file;

pub use docker::DockerLogsListener;
pub use file::FileListener;

use super::payload::ChunkStream;

/// A source of raw chunks.
///
/// Every call to `listen` returns a fresh, lazy stream: nothing happens until
/// it is first polled, and it cannot be restarted once it ends. Failures are
/// logged and end the stream; they are never yielded.
pub trait Listener: Send + Sync {
    fn listen(&self) -> ChunkStream;
}
