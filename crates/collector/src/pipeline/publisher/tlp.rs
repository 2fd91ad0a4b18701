use tracing::warn;

use crate::pipeline::payload::Payload;
use crate::tlp::TlpClient;

use super::Publisher;

/// Submits normalized records to the log processor, fire-and-forget.
#[derive(Debug, Clone)]
pub struct TlpPublisher {
    client: TlpClient,
}

impl TlpPublisher {
    pub fn new(client: TlpClient) -> Self {
        Self { client }
    }
}

impl Publisher for TlpPublisher {
    fn publish(&self, record: &Payload) {
        match record {
            Payload::Record(message) => self.client.submit(message.clone()),
            other => warn!(kind = other.kind(), "Log processor accepts normalized records only"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tlp::{Level, LogMessage};
    use std::time::Duration;
    use wiremock::{matchers::{method, path}, Mock, MockServer, ResponseTemplate};

    async fn wait_for_requests(server: &MockServer, count: usize) -> usize {
        for _ in 0..50 {
            let received = server.received_requests().await.unwrap_or_default().len();
            if received >= count {
                return received;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        server.received_requests().await.unwrap_or_default().len()
    }

    #[tokio::test]
    async fn test_publishes_records_only() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/logs"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let publisher = TlpPublisher::new(TlpClient::new(&mock_server.uri()).unwrap());
        publisher.publish(&Payload::Text("not a record".to_string()));
        publisher.publish(&Payload::Record(LogMessage {
            source: "billing".to_string(),
            thread_name: "main".to_string(),
            time_stamp: 1,
            logger_name: "default".to_string(),
            level: Level::new("INFO"),
            content: "hello".to_string(),
            exception: None,
            context: None,
        }));

        assert_eq!(wait_for_requests(&mock_server, 1).await, 1);
    }

    #[tokio::test]
    async fn test_unreachable_server_does_not_panic() {
        // nothing listens on port 9 locally
        let publisher = TlpPublisher::new(TlpClient::new("http://127.0.0.1:9").unwrap());
        publisher.publish(&Payload::Record(LogMessage {
            source: "billing".to_string(),
            thread_name: "main".to_string(),
            time_stamp: 1,
            logger_name: "default".to_string(),
            level: Level::new("INFO"),
            content: "lost".to_string(),
            exception: None,
            context: None,
        }));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
