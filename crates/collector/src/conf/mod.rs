//! Conf module: configuration model and loading.

pub mod model;
pub mod load;

pub use load::ConfigError;
pub use model::{
    CollectorConfig, ConnectionConfig, CustomMapping, DockerConnection, DockerConnectionType,
    ListenerConfig, ListenerType, MapperType, ParserType, PipelineConfig, PublisherType,
    SystemConfig, TlpConnection,
};
