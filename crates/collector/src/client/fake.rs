//! Fake: test double for Docker operations.
//!
//! Provides a deterministic [`FakeDocker`] that implements [`DockerOps`]
//! using in-memory state, so listeners and pipelines can be exercised
//! without a running Docker daemon.

use std::pin::Pin;

use bytes::Bytes;
use tokio::sync::Mutex;

use crate::client::docker::DockerOps;
use crate::docker::client::DockerError;
use crate::docker::inventory::ContainerDefinition;
use crate::docker::stream::{LogStreamRequest, RawLogStream};

/// A canned container for the fake store.
#[derive(Clone, Debug)]
pub struct FakeContainer {
    pub definition: ContainerDefinition,
    /// Emitted in order, one item per chunk.
    pub chunks: Vec<Bytes>,
    /// End the log stream with an error after the chunks.
    pub fail_after_chunks: bool,
}

impl FakeContainer {
    pub fn new(id: &str, name: &str, chunks: &[&[u8]]) -> Self {
        Self {
            definition: ContainerDefinition::new(id, &[name]),
            chunks: chunks.iter().map(|c| Bytes::copy_from_slice(c)).collect(),
            fail_after_chunks: false,
        }
    }
}

/// Mutable inner state protected by a mutex.
#[derive(Default)]
struct Inner {
    containers: Vec<FakeContainer>,
    list_error: Option<String>,
    open_error: Option<String>,
    /// `(container_id, since)` of every log stream opened.
    opened: Vec<(String, i32)>,
    list_calls: usize,
}

/// A fake Docker client for deterministic testing.
pub struct FakeDocker {
    inner: Mutex<Inner>,
}

impl FakeDocker {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::default()) }
    }

    /// Seed a container. List order is insertion order.
    pub async fn add_container(&self, container: FakeContainer) {
        self.inner.lock().await.containers.push(container);
    }

    /// Make `list_containers` fail with a connection error.
    pub async fn fail_list(&self, reason: &str) {
        self.inner.lock().await.list_error = Some(reason.to_string());
    }

    /// Make `stream_logs` fail before any data.
    pub async fn fail_open(&self, reason: &str) {
        self.inner.lock().await.open_error = Some(reason.to_string());
    }

    pub async fn opened_streams(&self) -> Vec<(String, i32)> {
        self.inner.lock().await.opened.clone()
    }

    pub async fn list_calls(&self) -> usize {
        self.inner.lock().await.list_calls
    }
}

impl Default for FakeDocker {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerOps for FakeDocker {
    fn list_containers(
        &self,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<Vec<ContainerDefinition>, DockerError>> + Send + '_>> {
        Box::pin(async {
            let mut state = self.inner.lock().await;
            state.list_calls += 1;
            if let Some(reason) = &state.list_error {
                return Err(DockerError::ConnectionFailed(reason.clone()));
            }
            Ok(state.containers.iter().map(|c| c.definition.clone()).collect())
        })
    }

    fn stream_logs(
        &self,
        request: LogStreamRequest,
    ) -> Pin<Box<dyn std::future::Future<Output = Result<RawLogStream, DockerError>> + Send + '_>> {
        Box::pin(async move {
            let mut state = self.inner.lock().await;
            state.opened.push((request.container_id.clone(), request.since));
            if let Some(reason) = &state.open_error {
                return Err(DockerError::ConnectionFailed(reason.clone()));
            }
            let container = state
                .containers
                .iter()
                .find(|c| c.definition.id == request.container_id)
                .ok_or_else(|| DockerError::ContainerNotFound(request.container_id.clone()))?;

            let mut items: Vec<Result<Bytes, DockerError>> =
                container.chunks.iter().cloned().map(Ok).collect();
            if container.fail_after_chunks {
                items.push(Err(DockerError::StreamClosed));
            }
            Ok(Box::pin(tokio_stream::iter(items)) as RawLogStream)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::StreamExt;

    #[tokio::test]
    async fn test_list_containers_keeps_insertion_order() {
        let fake = FakeDocker::new();
        fake.add_container(FakeContainer::new("abc123", "/web", &[])).await;
        fake.add_container(FakeContainer::new("def456", "/db", &[])).await;

        let containers = fake.list_containers().await.unwrap();
        let ids: Vec<_> = containers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["abc123", "def456"]);
        assert_eq!(fake.list_calls().await, 1);
    }

    #[tokio::test]
    async fn test_list_failure() {
        let fake = FakeDocker::new();
        fake.fail_list("daemon down").await;
        assert!(matches!(fake.list_containers().await, Err(DockerError::ConnectionFailed(_))));
    }

    #[tokio::test]
    async fn test_stream_logs_yields_chunks_then_error() {
        let fake = FakeDocker::new();
        let mut container = FakeContainer::new("abc123", "/web", &[b"one", b"two"]);
        container.fail_after_chunks = true;
        fake.add_container(container).await;

        let request = LogStreamRequest { container_id: "abc123".to_string(), since: 42 };
        let stream = fake.stream_logs(request).await.unwrap();
        let items: Vec<_> = stream.collect().await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from_static(b"one"));
        assert_eq!(items[1].as_ref().unwrap(), &Bytes::from_static(b"two"));
        assert!(items[2].is_err());
        assert_eq!(fake.opened_streams().await, vec![("abc123".to_string(), 42)]);
    }

    #[tokio::test]
    async fn test_stream_logs_unknown_id() {
        let fake = FakeDocker::new();
        let request = LogStreamRequest { container_id: "nope".to_string(), since: 0 };
        assert!(matches!(fake.stream_logs(request).await, Err(DockerError::ContainerNotFound(_))));
    }
}
