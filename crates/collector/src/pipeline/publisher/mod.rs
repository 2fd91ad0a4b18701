//! Publishers: side-effecting sinks for mapped records.

pub mod console;
pub mod tlp;

pub use console::ConsolePublisher;
pub use tlp::TlpPublisher;

use super::payload::Payload;

/// A sink for one record. Implementations handle their own failures;
/// `publish` never blocks on network I/O and never raises.
pub trait Publisher: Send + Sync {
    fn publish(&self, record: &Payload);
}
