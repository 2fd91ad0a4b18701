use std::sync::Arc;

use crate::conf::{PipelineConfig, PublisherType};
use crate::pipeline::publisher::{ConsolePublisher, Publisher, TlpPublisher};

use super::FactoryError;

/// Publishers are stateless, so every pipeline shares the same instances.
pub struct PublisherFactory {
    console: Arc<ConsolePublisher>,
    tlp: Option<Arc<TlpPublisher>>,
}

impl PublisherFactory {
    /// `tlp` is `None` when no log processor is configured; pipelines asking
    /// for it then fail to build.
    pub fn new(console: Arc<ConsolePublisher>, tlp: Option<Arc<TlpPublisher>>) -> Self {
        Self { console, tlp }
    }

    pub fn get_publishers(&self, config: &PipelineConfig) -> Result<Vec<Arc<dyn Publisher>>, FactoryError> {
        config
            .publishers
            .iter()
            .map(|publisher_type| match publisher_type {
                PublisherType::Console => Ok(Arc::clone(&self.console) as Arc<dyn Publisher>),
                PublisherType::Tlp => self
                    .tlp
                    .as_ref()
                    .map(|tlp| Arc::clone(tlp) as Arc<dyn Publisher>)
                    .ok_or_else(|| FactoryError::missing(&config.log_stream_name, "connection.tlp.uri")),
            })
            .collect()
    }
}
