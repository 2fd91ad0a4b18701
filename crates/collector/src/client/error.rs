//! Error: re-exports DockerError so callers of `DockerOps` need not reach into `docker`.

pub use crate::docker::client::DockerError;
