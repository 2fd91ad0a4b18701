//! Factory module: resolves declared component variants into instances.
//!
//! Shared stateless components are built once here and handed to every
//! pipeline; stateful ones are built per pipeline.

pub mod listener;
pub mod mapper;
pub mod parser;
pub mod pipeline;
pub mod publisher;

pub use listener::ListenerFactory;
pub use mapper::MapperFactory;
pub use parser::ParserFactory;
pub use pipeline::PipelineFactory;
pub use publisher::PublisherFactory;

use thiserror::Error;

use crate::pipeline::mapper::MappingError;
use crate::tlp::TlpError;

#[derive(Error, Debug)]
pub enum FactoryError {
    #[error("Pipeline '{pipeline}' is missing required setting {setting}")]
    MissingSetting { pipeline: String, setting: &'static str },
    #[error("Pipeline '{pipeline}' has an invalid mapping: {source}")]
    Mapping {
        pipeline: String,
        #[source]
        source: MappingError,
    },
    #[error("Log processor client: {0}")]
    Tlp(#[from] TlpError),
}

impl FactoryError {
    pub(crate) fn missing(pipeline: &str, setting: &'static str) -> Self {
        FactoryError::MissingSetting { pipeline: pipeline.to_string(), setting }
    }
}
