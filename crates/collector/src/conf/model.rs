//! Configuration model: process-wide settings, connections and pipeline wiring.

use std::collections::HashMap;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    pub system: SystemConfig,
    pub connection: ConnectionConfig,
    pub pipelines: Vec<PipelineConfig>,
}

/// Process-wide settings shared by every pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Delay between a listener stream ending and the reconnection attempt.
    /// Also the rewind window of the Docker `since` cursor.
    pub reconnection_poll_rate_ms: u64,
    /// Drop the first 8 bytes of every chunk before decoding. bollard already
    /// removes Docker's stream frame header, so with a Docker listener this
    /// discards 8 bytes of log payload. Only for sources that still carry a
    /// raw frame header.
    pub enable_trimming_stdout_header: bool,
    pub file_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub docker: DockerConnection,
    pub tlp: TlpConnection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockerConnectionType {
    Socket,
    Tcp,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DockerConnection {
    #[serde(rename = "type")]
    pub connection_type: DockerConnectionType,
    /// Socket path (`/var/run/docker.sock`) or base URL (`http://localhost:2375`).
    /// Empty means the platform default.
    pub uri: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TlpConnection {
    pub uri: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ListenerType {
    Docker,
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParserType {
    ByteArray,
    JoiningJson,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapperType {
    Identity,
    LogstashToTlp,
    CustomToTlp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublisherType {
    Console,
    Tlp,
}

/// Variant-specific listener settings. Which field is required depends on
/// the pipeline's `listener_type`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    pub container_name: Option<String>,
    pub path: Option<PathBuf>,
}

/// Path expressions used by the custom mapper, keyed by target field.
///
/// Paths use the `$.field.nested[0]` form; a plain JSON pointer
/// (`/field/nested/0`) is accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomMapping {
    pub timestamp: Option<String>,
    pub level: Option<String>,
    pub logger_name: Option<String>,
    pub thread_name: Option<String>,
    pub content: Option<String>,
    pub message: Option<String>,
    pub stack_trace: Option<String>,
    pub class_name: Option<String>,
    pub context: HashMap<String, String>,
}

/// One pipeline: listener → parsers → mapper → publishers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Unique key, also sent downstream as the record's `source`.
    pub log_stream_name: String,
    pub listener_type: ListenerType,
    #[serde(default)]
    pub listener_config: ListenerConfig,
    #[serde(default)]
    pub parsers: Vec<ParserType>,
    pub mapper_type: MapperType,
    #[serde(default)]
    pub mapper_config: Option<CustomMapping>,
    #[serde(default)]
    pub publishers: Vec<PublisherType>,
}

fn default_enabled() -> bool { true }

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            reconnection_poll_rate_ms: 5000,
            enable_trimming_stdout_header: false,
            file_poll_interval_ms: 1000,
        }
    }
}

impl Default for DockerConnection {
    fn default() -> Self {
        Self {
            connection_type: DockerConnectionType::Socket,
            uri: "/var/run/docker.sock".to_string(),
        }
    }
}

impl CollectorConfig {
    /// Pipelines that should be built and started.
    pub fn enabled_pipelines(&self) -> impl Iterator<Item = &PipelineConfig> {
        self.pipelines.iter().filter(|p| p.enabled)
    }
}
