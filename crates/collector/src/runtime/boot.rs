//! Boot: logging init, config load, Docker connection, factory creation.

use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::DockerOps;
use crate::conf::CollectorConfig;
use crate::docker::DockerClient;
use crate::factory::PipelineFactory;

/// Initialise the tracing / logging subsystem.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "collector=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Load config, connect to Docker and build the pipeline factory.
///
/// Returns `(CollectorConfig, PipelineFactory)` on success.
pub fn boot() -> Result<(CollectorConfig, PipelineFactory), Box<dyn std::error::Error>> {
    info!("Starting Docker log collector v{}", env!("CARGO_PKG_VERSION"));

    let config = CollectorConfig::load()?;
    info!(
        "Loaded configuration: {} pipeline(s), {} enabled, reconnection delay={}ms",
        config.pipelines.len(),
        config.enabled_pipelines().count(),
        config.system.reconnection_poll_rate_ms
    );

    let docker = DockerClient::new(&config.connection.docker).map_err(|e| {
        error!("Failed to connect to Docker: {}", e);
        e
    })?;
    info!("Docker endpoint: {}", docker.endpoint());

    let docker: Arc<dyn DockerOps> = Arc::new(docker);
    let factory = PipelineFactory::from_config(&config, docker)?;

    Ok((config, factory))
}
