use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, error};

use super::model::LogMessage;

const LOGS_PATH: &str = "/logs";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum TlpError {
    #[error("Invalid log processor URI: {0}")]
    InvalidUri(String),
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected status: {0}")]
    UnexpectedStatus(u16),
}

/// HTTP client for the log processor's ingest endpoint.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct TlpClient {
    client: Client,
    logs_url: String,
}

impl TlpClient {
    pub fn new(uri: &str) -> Result<Self, TlpError> {
        let base = uri.trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(TlpError::InvalidUri(uri.to_string()));
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            logs_url: format!("{}{}", base, LOGS_PATH),
        })
    }

    pub fn logs_url(&self) -> &str {
        &self.logs_url
    }

    /// POST one record and wait for the response.
    pub async fn send(&self, message: &LogMessage) -> Result<(), TlpError> {
        let response = self.client.post(&self.logs_url).json(message).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TlpError::UnexpectedStatus(status.as_u16()));
        }
        debug!(source = %message.source, status = status.as_u16(), "Log message submitted");
        Ok(())
    }

    /// Fire-and-forget submission on a detached task. Failures are logged
    /// and dropped: no retry, no backlog.
    pub fn submit(&self, message: LogMessage) {
        let client = self.clone();
        tokio::spawn(async move {
            if let Err(e) = client.send(&message).await {
                error!(source = %message.source, error = %e, "Failed to submit log message");
            }
        });
    }
}
