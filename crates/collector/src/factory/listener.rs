use std::sync::Arc;
use std::time::Duration;

use crate::client::DockerOps;
use crate::conf::{ListenerType, PipelineConfig, SystemConfig};
use crate::pipeline::listener::{DockerLogsListener, FileListener, Listener};

use super::FactoryError;

pub struct ListenerFactory {
    docker: Arc<dyn DockerOps>,
    rewind_ms: u64,
    file_poll_interval: Duration,
}

impl ListenerFactory {
    pub fn new(docker: Arc<dyn DockerOps>, system: &SystemConfig) -> Self {
        Self {
            docker,
            rewind_ms: system.reconnection_poll_rate_ms,
            file_poll_interval: Duration::from_millis(system.file_poll_interval_ms),
        }
    }

    pub fn get_listener(&self, config: &PipelineConfig) -> Result<Box<dyn Listener>, FactoryError> {
        let settings = &config.listener_config;
        match config.listener_type {
            ListenerType::Docker => {
                let container = settings
                    .container_name
                    .as_deref()
                    .filter(|n| !n.trim().is_empty())
                    .ok_or_else(|| FactoryError::missing(&config.log_stream_name, "listener_config.container_name"))?;
                Ok(Box::new(DockerLogsListener::new(Arc::clone(&self.docker), container, self.rewind_ms)))
            }
            ListenerType::File => {
                let path = settings
                    .path
                    .as_ref()
                    .ok_or_else(|| FactoryError::missing(&config.log_stream_name, "listener_config.path"))?;
                Ok(Box::new(FileListener::new(path.clone(), self.file_poll_interval)))
            }
        }
    }
}
