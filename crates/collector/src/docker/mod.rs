//! Docker module: bollard-backed client, container inventory, log streams.

pub mod client;
pub mod container;
pub mod inventory;
pub mod stream;

pub use client::{DockerClient, DockerError};
pub use inventory::ContainerDefinition;
