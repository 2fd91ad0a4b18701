use std::sync::Arc;

use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use crate::client::DockerOps;
use crate::docker::inventory::{find_by_name, normalize_container_name};
use crate::docker::stream::{since_cursor, LogStreamRequest};
use crate::pipeline::payload::ChunkStream;

use super::Listener;

/// Follows the stdout log of a container looked up by name.
///
/// The name is resolved to an id on every `listen` call, so a recreated
/// container is picked up on the next reconnection.
pub struct DockerLogsListener {
    docker: Arc<dyn DockerOps>,
    container_name: String,
    rewind_ms: u64,
}

impl DockerLogsListener {
    /// `rewind_ms` moves the `since` cursor back from now; it is the
    /// reconnection poll rate so no lines are lost between attempts.
    pub fn new(docker: Arc<dyn DockerOps>, container_name: &str, rewind_ms: u64) -> Self {
        Self {
            docker,
            container_name: normalize_container_name(container_name),
            rewind_ms,
        }
    }

    pub fn container_name(&self) -> &str {
        &self.container_name
    }
}

impl Listener for DockerLogsListener {
    fn listen(&self) -> ChunkStream {
        let docker = Arc::clone(&self.docker);
        let name = self.container_name.clone();
        let rewind_ms = self.rewind_ms;

        Box::pin(async_stream::stream! {
            let containers = match docker.list_containers().await {
                Ok(containers) => containers,
                Err(e) => {
                    error!(container = %name, error = %e, "Failed to list containers");
                    return;
                }
            };

            let Some(container) = find_by_name(&containers, &name) else {
                warn!(container = %name, "Container not found");
                return;
            };

            let since = since_cursor(chrono::Utc::now().timestamp_millis(), rewind_ms);
            let request = LogStreamRequest { container_id: container.id.clone(), since };
            let mut logs = match docker.stream_logs(request).await {
                Ok(logs) => logs,
                Err(e) => {
                    error!(container = %name, error = %e, "Failed to open log stream");
                    return;
                }
            };
            info!(container = %name, id = %container.id, since, "Following container logs");

            while let Some(item) = logs.next().await {
                match item {
                    Ok(chunk) => yield chunk,
                    Err(e) => {
                        error!(container = %name, error = %e, "Log stream failed");
                        return;
                    }
                }
            }
            debug!(container = %name, "Log stream ended");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{FakeContainer, FakeDocker};
    use bytes::Bytes;

    async fn fake_with(containers: Vec<FakeContainer>) -> Arc<FakeDocker> {
        let fake = Arc::new(FakeDocker::new());
        for c in containers {
            fake.add_container(c).await;
        }
        fake
    }

    #[tokio::test]
    async fn test_container_not_found_completes_empty() {
        let fake = fake_with(vec![FakeContainer::new("1", "/web", &[b"nope"])]).await;
        let listener = DockerLogsListener::new(fake.clone(), "api", 5000);

        let chunks: Vec<Bytes> = listener.listen().collect().await;
        assert!(chunks.is_empty());
        assert!(fake.opened_streams().await.is_empty());
    }

    #[tokio::test]
    async fn test_forwards_chunks_in_order() {
        let fake = fake_with(vec![
            FakeContainer::new("1", "/web", &[b"wrong"]),
            FakeContainer::new("2", "/api", &[b"first", b"second", b"third"]),
        ])
        .await;
        let listener = DockerLogsListener::new(fake.clone(), "api", 5000);

        let chunks: Vec<Bytes> = listener.listen().collect().await;
        assert_eq!(
            chunks,
            vec![
                Bytes::from_static(b"first"),
                Bytes::from_static(b"second"),
                Bytes::from_static(b"third"),
            ]
        );
    }

    #[tokio::test]
    async fn test_name_with_leading_slash_is_kept() {
        let fake = fake_with(vec![FakeContainer::new("2", "/api", &[b"x"])]).await;
        let listener = DockerLogsListener::new(fake, "/api", 5000);
        assert_eq!(listener.container_name(), "/api");
        assert_eq!(listener.listen().collect::<Vec<_>>().await.len(), 1);
    }

    #[tokio::test]
    async fn test_since_cursor_rewinds_poll_rate() {
        let fake = fake_with(vec![FakeContainer::new("2", "/api", &[])]).await;
        let listener = DockerLogsListener::new(fake.clone(), "api", 60_000);

        let before = since_cursor(chrono::Utc::now().timestamp_millis(), 60_000);
        let _: Vec<Bytes> = listener.listen().collect().await;
        let after = since_cursor(chrono::Utc::now().timestamp_millis(), 60_000);

        let opened = fake.opened_streams().await;
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].0, "2");
        assert!(opened[0].1 >= before && opened[0].1 <= after);
    }

    #[tokio::test]
    async fn test_stream_error_ends_stream_after_data() {
        let mut container = FakeContainer::new("2", "/api", &[b"kept"]);
        container.fail_after_chunks = true;
        let fake = fake_with(vec![container]).await;
        let listener = DockerLogsListener::new(fake, "api", 5000);

        let chunks: Vec<Bytes> = listener.listen().collect().await;
        assert_eq!(chunks, vec![Bytes::from_static(b"kept")]);
    }

    #[tokio::test]
    async fn test_list_failure_completes_empty() {
        let fake = fake_with(vec![FakeContainer::new("2", "/api", &[b"x"])]).await;
        fake.fail_list("daemon down").await;
        let listener = DockerLogsListener::new(fake, "api", 5000);
        assert!(listener.listen().collect::<Vec<_>>().await.is_empty());
    }

    #[tokio::test]
    async fn test_open_failure_completes_empty() {
        let fake = fake_with(vec![FakeContainer::new("2", "/api", &[b"x"])]).await;
        fake.fail_open("refused").await;
        let listener = DockerLogsListener::new(fake, "api", 5000);
        assert!(listener.listen().collect::<Vec<_>>().await.is_empty());
    }

    #[tokio::test]
    async fn test_each_listen_rediscovers_container() {
        let fake = fake_with(vec![FakeContainer::new("2", "/api", &[])]).await;
        let listener = DockerLogsListener::new(fake.clone(), "api", 5000);

        let _: Vec<Bytes> = listener.listen().collect().await;
        let _: Vec<Bytes> = listener.listen().collect().await;
        assert_eq!(fake.list_calls().await, 2);
    }
}
