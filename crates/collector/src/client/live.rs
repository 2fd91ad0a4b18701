//! Live: implements `DockerOps` for the real Bollard-backed `DockerClient`.

use std::pin::Pin;

use crate::client::docker::DockerOps;
use crate::docker::client::{DockerClient, DockerError};
use crate::docker::inventory::ContainerDefinition;
use crate::docker::stream::{LogStreamRequest, RawLogStream};

impl DockerOps for DockerClient {
    fn list_containers(
        &self,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<ContainerDefinition>, DockerError>> + Send + '_>> {
        Box::pin(self.list_containers())
    }

    fn stream_logs(
        &self,
        request: LogStreamRequest,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<RawLogStream, DockerError>> + Send + '_>> {
        let stream = DockerClient::stream_logs(self, request);
        Box::pin(async move { Ok(stream) })
    }
}
