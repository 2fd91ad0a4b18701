use std::sync::Arc;

use crate::conf::{ParserType, PipelineConfig};
use crate::pipeline::parser::{ByteArrayParser, JoiningJsonParser, Parser};

/// Hands out the shared byte parser and a new joining parser per pipeline.
pub struct ParserFactory {
    byte_array: Arc<ByteArrayParser>,
}

impl ParserFactory {
    pub fn new(strip_header: bool) -> Self {
        Self { byte_array: Arc::new(ByteArrayParser::new(strip_header)) }
    }

    pub fn get_parsers(&self, config: &PipelineConfig) -> Vec<Arc<dyn Parser>> {
        config
            .parsers
            .iter()
            .map(|parser_type| match parser_type {
                ParserType::ByteArray => Arc::clone(&self.byte_array) as Arc<dyn Parser>,
                ParserType::JoiningJson => Arc::new(JoiningJsonParser::new()) as Arc<dyn Parser>,
            })
            .collect()
    }
}
