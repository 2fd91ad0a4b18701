use crate::pipeline::payload::Payload;

use super::Mapper;

/// Passes every item through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapper;

impl Mapper for IdentityMapper {
    fn map(&self, input: Payload) -> Option<Payload> {
        Some(input)
    }
}
