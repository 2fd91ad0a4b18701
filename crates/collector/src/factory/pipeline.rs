use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::client::DockerOps;
use crate::conf::{CollectorConfig, PipelineConfig};
use crate::pipeline::publisher::{ConsolePublisher, TlpPublisher};
use crate::pipeline::{Pipeline, Stages};
use crate::tlp::TlpClient;

use super::{FactoryError, ListenerFactory, MapperFactory, ParserFactory, PublisherFactory};

/// Composes pipelines from their configuration entries.
pub struct PipelineFactory {
    listeners: ListenerFactory,
    parsers: ParserFactory,
    mappers: MapperFactory,
    publishers: PublisherFactory,
    reconnection_delay: Duration,
}

impl PipelineFactory {
    pub fn new(
        listeners: ListenerFactory,
        parsers: ParserFactory,
        mappers: MapperFactory,
        publishers: PublisherFactory,
        reconnection_delay: Duration,
    ) -> Self {
        Self { listeners, parsers, mappers, publishers, reconnection_delay }
    }

    /// Build the component factories and their shared instances.
    pub fn from_config(config: &CollectorConfig, docker: Arc<dyn DockerOps>) -> Result<Self, FactoryError> {
        let system = &config.system;
        let tlp_uri = config.connection.tlp.uri.trim();
        let tlp = if tlp_uri.is_empty() {
            None
        } else {
            Some(Arc::new(TlpPublisher::new(TlpClient::new(tlp_uri)?)))
        };

        Ok(Self::new(
            ListenerFactory::new(docker, system),
            ParserFactory::new(system.enable_trimming_stdout_header),
            MapperFactory,
            PublisherFactory::new(Arc::new(ConsolePublisher::stdout()), tlp),
            Duration::from_millis(system.reconnection_poll_rate_ms),
        ))
    }

    pub fn build(&self, config: &PipelineConfig, reconnect_tx: UnboundedSender<String>) -> Result<Pipeline, FactoryError> {
        let stages = Stages {
            listener: self.listeners.get_listener(config)?,
            parsers: self.parsers.get_parsers(config),
            mapper: self.mappers.get_mapper(config)?,
            publishers: self.publishers.get_publishers(config)?,
        };
        Ok(Pipeline::new(
            config.log_stream_name.clone(),
            stages,
            reconnect_tx,
            self.reconnection_delay,
        ))
    }
}
