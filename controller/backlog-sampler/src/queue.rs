//! Queue depth reader trait and HTTP implementation
//!
//! Fetches the approximate message count of one named queue. The queue
//! backend reports the count as a JSON string or number; both are accepted.

use crate::error::SampleError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// Point-in-time reading of one queue's depth
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    pub queue_id: String,
    pub approximate_message_count: u64,
    pub sampled_at: DateTime<Utc>,
}

/// Reads the current approximate depth of a named queue
#[async_trait]
pub trait QueueDepthReader: Send + Sync {
    async fn queue_depth(&self, queue_id: &str) -> Result<QueueSnapshot, SampleError>;
}

#[derive(Debug, Deserialize)]
struct QueueAttributesResponse {
    approximate_message_count: CountField,
}

/// Queue backends report counts as text or as numbers
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CountField {
    Number(i64),
    Text(String),
}

impl CountField {
    fn parse(&self) -> Result<i64, String> {
        match self {
            CountField::Number(n) => Ok(*n),
            CountField::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("unparseable message count {:?}: {}", s, e)),
        }
    }
}

/// HTTP queue client - reads queue attributes from the queue service API
pub struct HttpQueueClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpQueueClient {
    /// Create a new queue client with a per-call timeout
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, SampleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SampleError::QueueUnavailable {
                queue_id: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn unavailable(&self, queue_id: &str, reason: String) -> SampleError {
        error!(queue_id = %queue_id, reason = %reason, "Could not get queue attributes");
        SampleError::QueueUnavailable {
            queue_id: queue_id.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl QueueDepthReader for HttpQueueClient {
    async fn queue_depth(&self, queue_id: &str) -> Result<QueueSnapshot, SampleError> {
        let url = format!("{}/queues/{}/attributes", self.base_url, queue_id);
        debug!(queue_id = %queue_id, url = %url, "Fetching queue attributes");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.unavailable(queue_id, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(self.unavailable(queue_id, format!("backend returned status {}", status)));
        }

        let attributes: QueueAttributesResponse = response
            .json()
            .await
            .map_err(|e| self.unavailable(queue_id, format!("invalid response body: {}", e)))?;

        let count = attributes
            .approximate_message_count
            .parse()
            .map_err(|reason| self.unavailable(queue_id, reason))?;

        if count < 0 {
            return Err(SampleError::ComputationInvalid {
                reason: format!("queue {} reported negative message count {}", queue_id, count),
            });
        }

        Ok(QueueSnapshot {
            queue_id: queue_id.to_string(),
            approximate_message_count: count as u64,
            sampled_at: Utc::now(),
        })
    }
}
