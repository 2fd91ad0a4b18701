//! TLP module: client and wire model for the downstream log processor.

pub mod client;
pub mod model;

pub use client::{TlpClient, TlpError};
pub use model::{ErrorLog, Level, LogMessage};
