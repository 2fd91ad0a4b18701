use std::io::Write;
use std::sync::Mutex;

use tracing::warn;

use crate::pipeline::payload::Payload;

use super::Publisher;

/// Writes one line per record to stdout (or any writer, for tests).
pub struct ConsolePublisher {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsolePublisher {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self { writer: Mutex::new(Box::new(writer)) }
    }
}

impl Publisher for ConsolePublisher {
    fn publish(&self, record: &Payload) {
        let line = record.to_line();
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush()) {
            warn!(error = %e, "Failed to write record to console");
        }
    }
}
