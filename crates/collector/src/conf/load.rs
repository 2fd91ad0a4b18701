//! Load: config loading from the TOML file plus environment overrides.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;

use super::model::{CollectorConfig, DockerConnectionType, ListenerType, PipelineConfig};

const DEFAULT_CONFIG_PATH: &str = "/etc/collector/collector.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl CollectorConfig {
    /// Load configuration from file, then apply environment overrides.
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = std::env::var("COLLECTOR_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using defaults", config_path);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Apply overrides for the connection and timing settings.
    /// `lookup` is `std::env::var` in production.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(socket) = lookup("DOCKER_SOCKET") {
            self.connection.docker.connection_type = DockerConnectionType::Socket;
            self.connection.docker.uri = socket;
        }
        if let Some(uri) = lookup("COLLECTOR_DOCKER_URI") {
            if uri.starts_with("http://") || uri.starts_with("tcp://") {
                self.connection.docker.connection_type = DockerConnectionType::Tcp;
            }
            self.connection.docker.uri = uri;
        }
        if let Some(uri) = lookup("COLLECTOR_TLP_URI") {
            self.connection.tlp.uri = uri;
        }
        match lookup("COLLECTOR_RECONNECTION_POLL_RATE_MS").map(|s| s.parse::<u64>()) {
            Some(Ok(ms)) => self.system.reconnection_poll_rate_ms = ms,
            Some(Err(e)) => tracing::warn!(error = %e, "Ignoring COLLECTOR_RECONNECTION_POLL_RATE_MS"),
            None => {}
        }
    }

    /// Validate cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if self.system.reconnection_poll_rate_ms == 0 {
            return Err("system.reconnection_poll_rate_ms must be > 0".to_string());
        }
        if self.system.file_poll_interval_ms == 0 {
            return Err("system.file_poll_interval_ms must be > 0".to_string());
        }

        let mut seen = HashSet::new();
        for pipeline in &self.pipelines {
            if pipeline.log_stream_name.trim().is_empty() {
                return Err("log_stream_name must not be empty".to_string());
            }
            if !seen.insert(pipeline.log_stream_name.as_str()) {
                return Err(format!("duplicate log_stream_name '{}'", pipeline.log_stream_name));
            }
            if pipeline.enabled {
                pipeline.validate()?;
            }
        }
        Ok(())
    }
}

impl PipelineConfig {
    fn validate(&self) -> Result<(), String> {
        let name = &self.log_stream_name;
        if self.publishers.is_empty() {
            return Err(format!("pipeline '{}' has no publishers", name));
        }
        match self.listener_type {
            ListenerType::Docker => {
                let container = self.listener_config.container_name.as_deref().unwrap_or("");
                if container.trim().is_empty() {
                    return Err(format!("pipeline '{}' needs listener_config.container_name", name));
                }
            }
            ListenerType::File => {
                if self.listener_config.path.is_none() {
                    return Err(format!("pipeline '{}' needs listener_config.path", name));
                }
            }
        }
        Ok(())
    }
}
