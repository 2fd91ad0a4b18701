//! Pipeline module: listener → parsers → mapper → publishers, and the
//! running unit that owns reconnection scheduling.

pub mod listener;
pub mod mapper;
pub mod parser;
pub mod payload;
pub mod publisher;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future;
use futures_util::stream::StreamExt;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use listener::Listener;
use mapper::Mapper;
use parser::Parser;
use payload::{Payload, PayloadStream};
use publisher::Publisher;

/// The components of one pipeline, in data-flow order.
pub struct Stages {
    pub listener: Box<dyn Listener>,
    pub parsers: Vec<Arc<dyn Parser>>,
    pub mapper: Arc<dyn Mapper>,
    pub publishers: Vec<Arc<dyn Publisher>>,
}

impl Stages {
    /// Subscribe to the listener and thread every item through the chain.
    ///
    /// Each parser is flat-mapped, so one item from stage i invokes stage
    /// i+1 once per emitted item. Items the mapper rejects are dropped.
    fn records(&self) -> PayloadStream {
        let mut stream: PayloadStream = Box::pin(self.listener.listen().map(Payload::Chunk));
        for parser in &self.parsers {
            let parser = Arc::clone(parser);
            stream = Box::pin(stream.flat_map(move |item| parser.parse(item)));
        }
        let mapper = Arc::clone(&self.mapper);
        Box::pin(stream.filter_map(move |item| future::ready(mapper.map(item))))
    }

    fn publish(&self, record: &Payload) {
        for publisher in &self.publishers {
            publisher.publish(record);
        }
    }
}

/// A named, independently restartable pipeline.
///
/// At most one subscription is live at a time: `start` aborts the previous
/// one before subscribing again. When a subscription's listener stream ends
/// the pipeline waits `reconnection_delay` and then sends its name on the
/// reconnection channel.
pub struct Pipeline {
    name: String,
    stages: Arc<Stages>,
    reconnect_tx: UnboundedSender<String>,
    reconnection_delay: Duration,
    task: Option<JoinHandle<()>>,
    starts: u64,
}

impl Pipeline {
    pub fn new(
        name: impl Into<String>,
        stages: Stages,
        reconnect_tx: UnboundedSender<String>,
        reconnection_delay: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            stages: Arc::new(stages),
            reconnect_tx,
            reconnection_delay,
            task: None,
            starts: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of times `start` has been called.
    pub fn starts(&self) -> u64 {
        self.starts
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Establish a fresh subscription, tearing down the previous one.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        if let Some(previous) = self.task.take() {
            if !previous.is_finished() {
                debug!(stream = %self.name, "Tearing down previous subscription");
            }
            previous.abort();
        }

        self.starts += 1;
        info!(stream = %self.name, attempt = self.starts, "Starting pipeline");
        self.task = Some(tokio::spawn(run(
            self.name.clone(),
            Arc::clone(&self.stages),
            self.reconnect_tx.clone(),
            self.reconnection_delay,
        )));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(
    name: String,
    stages: Arc<Stages>,
    reconnect_tx: UnboundedSender<String>,
    reconnection_delay: Duration,
) {
    let mut records = stages.records();
    let mut published = 0u64;
    while let Some(record) = records.next().await {
        stages.publish(&record);
        published += 1;
    }
    drop(records);

    info!(
        stream = %name,
        published,
        delay_ms = reconnection_delay.as_millis() as u64,
        "Listener stream ended; scheduling reconnection"
    );
    tokio::time::sleep(reconnection_delay).await;
    if reconnect_tx.send(name).is_err() {
        debug!("Reconnection channel closed");
    }
}


#[cfg(test)]
mod tests {
    use super::mapper::IdentityMapper;
    use super::parser::{ByteArrayParser, JoiningJsonParser};
    use super::testing::{RecordingPublisher, ScriptedListener};
    use super::*;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use tokio::sync::mpsc;
    use tokio::time::Instant;

    const DELAY: Duration = Duration::from_millis(5000);

    /// Rejects documents carrying `"drop": true`.
    struct DroppingMapper;

    impl Mapper for DroppingMapper {
        fn map(&self, input: Payload) -> Option<Payload> {
            match &input {
                Payload::Document(doc) if doc["drop"] == json!(true) => None,
                _ => Some(input),
            }
        }
    }

    fn json_stages(listener: ScriptedListener, mapper: Arc<dyn Mapper>, publishers: Vec<Arc<dyn Publisher>>) -> Stages {
        Stages {
            listener: Box::new(listener),
            parsers: vec![
                Arc::new(ByteArrayParser::new(false)),
                Arc::new(JoiningJsonParser::new()),
            ],
            mapper,
            publishers,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_end_to_end_two_documents() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let publisher = RecordingPublisher::default();
        let listener = ScriptedListener::new(&[b"{\"x\":1}\n{\"x\":2}\n"]);
        let mut pipeline = Pipeline::new(
            "orders",
            json_stages(listener, Arc::new(IdentityMapper), vec![Arc::new(publisher.clone())]),
            tx,
            DELAY,
        );

        pipeline.start();
        assert_eq!(rx.recv().await.as_deref(), Some("orders"));

        assert_eq!(
            publisher.published(),
            vec![Payload::Document(json!({"x": 1})), Payload::Document(json!({"x": 2}))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fragments_are_joined_across_chunks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let publisher = RecordingPublisher::default();
        let listener = ScriptedListener::new(&[b"{\"a\"", b":1}\n{\"b\":", b"2}\n"]);
        let mut pipeline = Pipeline::new(
            "orders",
            json_stages(listener, Arc::new(IdentityMapper), vec![Arc::new(publisher.clone())]),
            tx,
            DELAY,
        );

        pipeline.start();
        rx.recv().await;

        assert_eq!(
            publisher.published(),
            vec![Payload::Document(json!({"a": 1})), Payload::Document(json!({"b": 2}))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_records_never_reach_publishers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let publisher = RecordingPublisher::default();
        let listener = ScriptedListener::new(&[b"{\"n\":1}\n{\"n\":2,\"drop\":true}\n{\"n\":3}\n"]);
        let mut pipeline = Pipeline::new(
            "orders",
            json_stages(listener, Arc::new(DroppingMapper), vec![Arc::new(publisher.clone())]),
            tx,
            DELAY,
        );

        pipeline.start();
        rx.recv().await;

        assert_eq!(
            publisher.published(),
            vec![Payload::Document(json!({"n": 1})), Payload::Document(json!({"n": 3}))]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_fans_out_to_every_publisher() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let first = RecordingPublisher::default();
        let second = RecordingPublisher::default();
        let listener = ScriptedListener::new(&[b"{\"n\":1}\n", b"{\"n\":2}\n"]);
        let mut pipeline = Pipeline::new(
            "orders",
            json_stages(
                listener,
                Arc::new(IdentityMapper),
                vec![Arc::new(first.clone()), Arc::new(second.clone())],
            ),
            tx,
            DELAY,
        );

        pipeline.start();
        rx.recv().await;

        assert_eq!(first.published().len(), 2);
        assert_eq!(first.published(), second.published());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnection_notification_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let listener = ScriptedListener::new(&[]);
        let mut pipeline = Pipeline::new(
            "billing",
            json_stages(listener, Arc::new(IdentityMapper), vec![]),
            tx,
            DELAY,
        );

        let started = Instant::now();
        pipeline.start();
        let name = rx.recv().await;

        assert_eq!(name.as_deref(), Some("billing"));
        assert!(started.elapsed() >= DELAY);
        assert!(rx.try_recv().is_err(), "exactly one notification per stream end");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_tears_down_previous_subscription() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let publisher = RecordingPublisher::default();
        let mut listener = ScriptedListener::new(&[b"{\"n\":1}\n"]);
        listener.stay_open = true;
        let subscriptions = Arc::clone(&listener.subscriptions);
        let dropped = Arc::clone(&listener.dropped);

        let mut pipeline = Pipeline::new(
            "billing",
            json_stages(listener, Arc::new(IdentityMapper), vec![Arc::new(publisher.clone())]),
            tx,
            DELAY,
        );

        pipeline.start();
        tokio::task::yield_now().await;
        assert!(pipeline.is_running());

        pipeline.start();
        tokio::time::sleep(DELAY * 2).await;

        assert_eq!(pipeline.starts(), 2);
        assert_eq!(subscriptions.load(Ordering::SeqCst), 2);
        assert_eq!(dropped.load(Ordering::SeqCst), 1, "first subscription is dropped");
        assert_eq!(publisher.published().len(), 2);
        assert!(rx.try_recv().is_err(), "an aborted subscription does not reconnect");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_running_subscription() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut listener = ScriptedListener::new(&[]);
        listener.stay_open = true;
        let dropped = Arc::clone(&listener.dropped);

        let mut pipeline = Pipeline::new(
            "billing",
            json_stages(listener, Arc::new(IdentityMapper), vec![]),
            tx,
            DELAY,
        );
        pipeline.start();
        tokio::task::yield_now().await;
        drop(pipeline);
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(dropped.load(Ordering::SeqCst), 1);
    }
}
