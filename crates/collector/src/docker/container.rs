//! Container domain: list containers and follow a container's log stream.

use super::client::{DockerClient, DockerError};
use super::inventory::ContainerDefinition;
use super::stream::{LogStreamRequest, RawLogStream};

use bollard::container::LogOutput;
use bollard::query_parameters::{ListContainersOptions, LogsOptions};
use bytes::Bytes;
use futures_util::stream::StreamExt;

impl DockerClient {
    pub async fn list_containers(&self) -> Result<Vec<ContainerDefinition>, DockerError> {
        let options = Some(ListContainersOptions {
            all: true,
            ..Default::default()
        });
        let containers = self.client.list_containers(options).await?;
        Ok(containers.into_iter().map(|c| c.into()).collect())
    }

    /// Follow stdout of one container from `request.since` onwards.
    ///
    /// The returned stream never fails to open: bollard issues the request on
    /// first poll, so an unreachable daemon surfaces as the first item.
    pub fn stream_logs(&self, request: LogStreamRequest) -> RawLogStream {
        let options = LogsOptions {
            follow: true,
            stdout: true,
            stderr: false,
            since: request.since,
            until: 0,
            timestamps: false,
            tail: "all".to_string(),
        };

        let bollard_stream = self.client.logs(&request.container_id, Some(options));

        Box::pin(bollard_stream.map(|result| match result {
            Ok(output) => Ok(log_output_bytes(output)),
            Err(e) => Err(DockerError::from(e)),
        }))
    }
}

/// Payload of one log frame. bollard has already removed the multiplexing
/// header, so this is exactly what the container wrote.
pub(crate) fn log_output_bytes(output: LogOutput) -> Bytes {
    match output {
        LogOutput::StdOut { message }
        | LogOutput::StdErr { message }
        | LogOutput::StdIn { message }
        | LogOutput::Console { message } => message,
    }
}
