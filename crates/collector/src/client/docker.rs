//! Docker trait: abstract interface for the Docker operations the listeners need.
//!
//! `live.rs` provides the real Bollard-backed implementation.
//! `fake.rs` provides a test double.

use std::pin::Pin;

use crate::docker::client::DockerError;
use crate::docker::inventory::ContainerDefinition;
use crate::docker::stream::{LogStreamRequest, RawLogStream};

/// Async interface over the Docker daemon.
///
/// Object-safe thanks to `Pin<Box<…>>` returns, so listeners hold an
/// `Arc<dyn DockerOps>` shared by every pipeline.
pub trait DockerOps: Send + Sync {
    fn list_containers(
        &self,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<ContainerDefinition>, DockerError>> + Send + '_>>;

    fn stream_logs(
        &self,
        request: LogStreamRequest,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<RawLogStream, DockerError>> + Send + '_>>;
}
