use serde_json::{Map, Value};
use tracing::error;

use crate::conf::CustomMapping;
use crate::pipeline::payload::Payload;
use crate::tlp::{ErrorLog, Level, LogMessage};

use super::logstash::{DEFAULT_LOGGER, DEFAULT_THREAD, UNDEFINED_LEVEL};
use super::{parse_timestamp, value_kind, value_to_string, Mapper, MappingError};

/// A path expression compiled to a JSON pointer.
#[derive(Debug, Clone, PartialEq)]
struct FieldPath(String);

impl FieldPath {
    /// Accepts `$.a.b[0]`, `$['a']["b"]` and plain pointers (`/a/b/0`).
    fn compile(expr: &str) -> Result<Self, MappingError> {
        let expr = expr.trim();
        if expr.starts_with('/') {
            return Ok(Self(expr.to_string()));
        }
        let invalid = || MappingError::InvalidPath(expr.to_string());
        let rest = expr.strip_prefix('$').ok_or_else(invalid)?;

        let mut pointer = String::new();
        let mut chars = rest.chars().peekable();
        while let Some(c) = chars.next() {
            let token = match c {
                '.' => {
                    let mut name = String::new();
                    while let Some(&next) = chars.peek() {
                        if next == '.' || next == '[' {
                            break;
                        }
                        name.push(next);
                        chars.next();
                    }
                    name
                }
                '[' => {
                    let mut inner = String::new();
                    loop {
                        match chars.next() {
                            Some(']') => break,
                            Some(next) => inner.push(next),
                            None => return Err(invalid()),
                        }
                    }
                    let inner = inner.trim();
                    let quoted = (inner.starts_with('\'') && inner.ends_with('\''))
                        || (inner.starts_with('"') && inner.ends_with('"'));
                    if quoted && inner.len() >= 2 {
                        inner[1..inner.len() - 1].to_string()
                    } else if inner.parse::<usize>().is_ok() {
                        inner.to_string()
                    } else {
                        return Err(invalid());
                    }
                }
                _ => return Err(invalid()),
            };
            if token.is_empty() {
                return Err(invalid());
            }
            pointer.push('/');
            pointer.push_str(&token.replace('~', "~0").replace('/', "~1"));
        }
        Ok(Self(pointer))
    }

    fn resolve<'v>(&self, document: &'v Value) -> Option<&'v Value> {
        document.pointer(&self.0).filter(|v| !v.is_null())
    }
}

#[derive(Debug, Clone, Default)]
struct CompiledMapping {
    timestamp: Option<FieldPath>,
    level: Option<FieldPath>,
    logger_name: Option<FieldPath>,
    thread_name: Option<FieldPath>,
    content: Option<FieldPath>,
    message: Option<FieldPath>,
    stack_trace: Option<FieldPath>,
    class_name: Option<FieldPath>,
    context: Vec<(String, FieldPath)>,
}

fn compile(expr: &Option<String>) -> Result<Option<FieldPath>, MappingError> {
    expr.as_deref().map(FieldPath::compile).transpose()
}

impl CompiledMapping {
    fn new(mapping: &CustomMapping) -> Result<Self, MappingError> {
        let mut context = mapping
            .context
            .iter()
            .map(|(key, expr)| FieldPath::compile(expr).map(|path| (key.clone(), path)))
            .collect::<Result<Vec<_>, MappingError>>()?;
        context.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(Self {
            timestamp: compile(&mapping.timestamp)?,
            level: compile(&mapping.level)?,
            logger_name: compile(&mapping.logger_name)?,
            thread_name: compile(&mapping.thread_name)?,
            content: compile(&mapping.content)?,
            message: compile(&mapping.message)?,
            stack_trace: compile(&mapping.stack_trace)?,
            class_name: compile(&mapping.class_name)?,
            context,
        })
    }
}

/// Maps arbitrary JSON documents using a table of path expressions.
///
/// Unmapped or unresolved fields fall back to the same defaults as the
/// Logstash mapper; empty content is allowed.
#[derive(Debug, Clone)]
pub struct CustomMapper {
    source: String,
    mapping: CompiledMapping,
}

impl CustomMapper {
    pub fn new(source: impl Into<String>, mapping: &CustomMapping) -> Result<Self, MappingError> {
        Ok(Self {
            source: source.into(),
            mapping: CompiledMapping::new(mapping)?,
        })
    }

    fn text(&self, document: &Value, path: &Option<FieldPath>) -> Option<String> {
        path.as_ref()
            .and_then(|p| p.resolve(document))
            .and_then(value_to_string)
    }

    fn map_document(&self, document: &Value) -> Result<LogMessage, MappingError> {
        if !document.is_object() {
            return Err(MappingError::NotAnObject(value_kind(document)));
        }
        let m = &self.mapping;

        let time_stamp = match m.timestamp.as_ref().and_then(|p| p.resolve(document)) {
            Some(value) => parse_timestamp(value)?,
            None => 0,
        };
        let level = self
            .text(document, &m.level)
            .map(|l| l.to_uppercase())
            .unwrap_or_else(|| UNDEFINED_LEVEL.to_string());

        Ok(LogMessage {
            source: self.source.clone(),
            thread_name: self.text(document, &m.thread_name).unwrap_or_else(|| DEFAULT_THREAD.to_string()),
            time_stamp,
            logger_name: self.text(document, &m.logger_name).unwrap_or_else(|| DEFAULT_LOGGER.to_string()),
            level: Level::new(level),
            content: self.text(document, &m.content).unwrap_or_default(),
            exception: self.map_exception(document),
            context: self.map_context(document),
        })
    }

    fn map_exception(&self, document: &Value) -> Option<ErrorLog> {
        let m = &self.mapping;
        let message = self.text(document, &m.message).filter(|s| !s.is_empty())?;
        Some(ErrorLog {
            class_name: self.text(document, &m.class_name).unwrap_or_default(),
            message,
            stack_trace: self.text(document, &m.stack_trace),
        })
    }

    fn map_context(&self, document: &Value) -> Option<Map<String, Value>> {
        if self.mapping.context.is_empty() {
            return None;
        }
        let context = self
            .mapping
            .context
            .iter()
            .filter_map(|(key, path)| path.resolve(document).map(|v| (key.clone(), v.clone())))
            .collect();
        Some(context)
    }
}

impl Mapper for CustomMapper {
    fn map(&self, input: Payload) -> Option<Payload> {
        let Payload::Document(document) = &input else {
            error!(source = %self.source, kind = input.kind(), "Could not map input data; expected a JSON document");
            return None;
        };
        match self.map_document(document) {
            Ok(record) => Some(Payload::Record(record)),
            Err(e) => {
                error!(source = %self.source, error = %e, "Could not map input data");
                None
            }
        }
    }
}
