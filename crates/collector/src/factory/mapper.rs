use std::sync::Arc;

use crate::conf::{MapperType, PipelineConfig};
use crate::pipeline::mapper::{CustomMapper, IdentityMapper, LogstashMapper, Mapper};

use super::FactoryError;

#[derive(Debug, Clone, Copy, Default)]
pub struct MapperFactory;

impl MapperFactory {
    pub fn get_mapper(&self, config: &PipelineConfig) -> Result<Arc<dyn Mapper>, FactoryError> {
        let source = config.log_stream_name.as_str();
        let mapper: Arc<dyn Mapper> = match config.mapper_type {
            MapperType::Identity => Arc::new(IdentityMapper),
            MapperType::LogstashToTlp => Arc::new(LogstashMapper::new(source)),
            MapperType::CustomToTlp => {
                let mapping = config
                    .mapper_config
                    .as_ref()
                    .ok_or_else(|| FactoryError::missing(source, "mapper_config"))?;
                let mapper = CustomMapper::new(source, mapping).map_err(|e| FactoryError::Mapping {
                    pipeline: source.to_string(),
                    source: e,
                })?;
                Arc::new(mapper)
            }
        };
        Ok(mapper)
    }
}
