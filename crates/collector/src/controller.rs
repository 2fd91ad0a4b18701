//! Controller: owns every pipeline and the reconnection channel.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::conf::CollectorConfig;
use crate::factory::{FactoryError, PipelineFactory};
use crate::pipeline::Pipeline;

pub struct Controller {
    pipelines: Vec<Pipeline>,
    reconnect_tx: UnboundedSender<String>,
    reconnect_rx: UnboundedReceiver<String>,
}

impl Controller {
    pub fn new() -> Self {
        let (reconnect_tx, reconnect_rx) = mpsc::unbounded_channel();
        Self {
            pipelines: Vec::new(),
            reconnect_tx,
            reconnect_rx,
        }
    }

    /// Build one pipeline per enabled entry, then start each once.
    ///
    /// Nothing is started unless every enabled entry builds.
    pub fn init(&mut self, config: &CollectorConfig, factory: &PipelineFactory) -> Result<usize, FactoryError> {
        let pipelines = config
            .enabled_pipelines()
            .map(|entry| factory.build(entry, self.reconnect_tx.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        for skipped in config.pipelines.iter().filter(|p| !p.enabled) {
            debug!(stream = %skipped.log_stream_name, "Pipeline disabled");
        }

        self.pipelines = pipelines;
        for pipeline in &mut self.pipelines {
            pipeline.start();
        }
        info!(count = self.pipelines.len(), "Pipelines started");
        Ok(self.pipelines.len())
    }

    pub fn pipelines(&self) -> &[Pipeline] {
        &self.pipelines
    }

    /// Restart the pipeline called `name`. Unknown names are ignored.
    pub fn restart(&mut self, name: &str) -> bool {
        match self.pipelines.iter_mut().find(|p| p.name() == name) {
            Some(pipeline) => {
                info!(stream = %name, "Reconnecting pipeline");
                pipeline.start();
                true
            }
            None => {
                debug!(stream = %name, "No pipeline for reconnection notification");
                false
            }
        }
    }

    /// Next reconnection notification. Never `None` while the controller
    /// is alive since it holds a sender itself.
    pub async fn next_reconnection(&mut self) -> Option<String> {
        self.reconnect_rx.recv().await
    }

    /// Handle reconnection notifications until the channel closes.
    pub async fn run(&mut self) {
        while let Some(name) = self.next_reconnection().await {
            self.restart(&name);
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
