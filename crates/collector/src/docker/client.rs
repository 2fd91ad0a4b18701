//! Docker client: core struct, constructor, error types.
//!
//! Domain methods live in `container`, which adds an `impl DockerClient` block.

use bollard::Docker;
use thiserror::Error;

use crate::conf::{DockerConnection, DockerConnectionType};

#[derive(Error, Debug)]
pub enum DockerError {
    #[error("Docker connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Container not found: {0}")]
    ContainerNotFound(String),
    #[error("Stream closed")]
    StreamClosed,
    #[error("Bollard error: {0}")]
    BollardError(#[from] bollard::errors::Error),
}

const CONNECT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct DockerClient {
    pub(super) client: Docker,
    /// Socket path or base URL this client is connected to, for logging.
    pub(super) endpoint: String,
}

impl DockerClient {
    /// Connect over a unix socket path or a TCP base URL.
    /// An empty uri falls back to bollard's platform defaults (`DOCKER_HOST`).
    pub fn new(connection: &DockerConnection) -> Result<Self, DockerError> {
        let uri = connection.uri.trim();
        let client = if uri.is_empty() {
            Docker::connect_with_defaults()
        } else {
            match connection.connection_type {
                DockerConnectionType::Socket => {
                    let clean_path = uri.trim_start_matches("unix://");
                    Docker::connect_with_socket(clean_path, CONNECT_TIMEOUT_SECS, &bollard::API_DEFAULT_VERSION)
                }
                DockerConnectionType::Tcp => {
                    let addr = uri.replacen("tcp://", "http://", 1);
                    Docker::connect_with_http(&addr, CONNECT_TIMEOUT_SECS, &bollard::API_DEFAULT_VERSION)
                }
            }
        }
        .map_err(|e| DockerError::ConnectionFailed(e.to_string()))?;

        Ok(DockerClient {
            client,
            endpoint: if uri.is_empty() { "default".to_string() } else { uri.to_string() },
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
