//! Metric publisher trait and implementations
//!
//! The HTTP publisher POSTs one datapoint to the metrics backend; the
//! log-only publisher backs dry-run mode. Publishing is never retried here:
//! the backend does not deduplicate, so a retry after an ambiguous failure
//! would create a second datapoint.

use crate::compute::{BacklogMetricSample, BacklogValue, Dimension};
use crate::error::SampleError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use tracing::{error, info};

/// Finite value published in place of an undefined backlog ratio.
///
/// When messages are pending but no workers run, the true ratio is unbounded.
/// The backend only accepts finite numbers, so the sample is mapped to this
/// constant. It is orders of magnitude above any ratio a real fleet produces,
/// so threshold-based autoscaling policies read it as maximal pressure, and it
/// can never be mistaken for the genuine zero of an idle queue.
pub const UNDEFINED_BACKLOG_VALUE: f64 = 1.0e9;

/// Acknowledgment returned by the metrics backend for one datapoint
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub published_value: f64,
    pub timestamp: DateTime<Utc>,
}

/// Sends one metric sample to the metrics backend
#[async_trait]
pub trait MetricPublisher: Send + Sync {
    async fn publish(&self, sample: &BacklogMetricSample) -> Result<PublishReceipt, SampleError>;
}

/// Datapoint payload sent to the metrics backend
#[derive(Debug, Serialize)]
struct DatapointRequest<'a> {
    namespace: &'a str,
    metric_name: &'a str,
    dimensions: &'a [Dimension],
    value: f64,
    unit: &'a str,
    timestamp: DateTime<Utc>,
}

fn wire_value(value: BacklogValue) -> f64 {
    match value {
        BacklogValue::Finite(v) => v,
        BacklogValue::Undefined => UNDEFINED_BACKLOG_VALUE,
    }
}

/// HTTP metrics client - POSTs datapoints to the metrics backend API
pub struct HttpMetricsClient {
    base_url: String,
    namespace: String,
    client: reqwest::Client,
}

impl HttpMetricsClient {
    /// Create a new metrics client with a per-call timeout
    pub fn new(
        base_url: String,
        namespace: String,
        timeout_secs: u64,
    ) -> Result<Self, SampleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SampleError::PublishFailed {
                metric_name: crate::compute::METRIC_NAME.to_string(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            namespace,
            client,
        })
    }

    fn failed(&self, metric_name: &str, reason: String) -> SampleError {
        error!(metric_name = %metric_name, reason = %reason, "Could not publish metric");
        SampleError::PublishFailed {
            metric_name: metric_name.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl MetricPublisher for HttpMetricsClient {
    async fn publish(&self, sample: &BacklogMetricSample) -> Result<PublishReceipt, SampleError> {
        let value = wire_value(sample.value);
        let request = DatapointRequest {
            namespace: &self.namespace,
            metric_name: sample.metric_name,
            dimensions: &sample.dimensions,
            value,
            unit: sample.unit,
            timestamp: sample.timestamp,
        };

        let url = format!("{}/metrics", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.failed(sample.metric_name, format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(self.failed(
                sample.metric_name,
                format!("backend returned status {}", status),
            ));
        }

        info!(
            metric_name = %sample.metric_name,
            namespace = %self.namespace,
            value = value,
            undefined = sample.value.is_undefined(),
            "Published metric datapoint"
        );

        Ok(PublishReceipt {
            published_value: value,
            timestamp: sample.timestamp,
        })
    }
}

/// Log-only publisher (dry-run mode); always acknowledges
pub struct LogOnlyMetricPublisher;

#[async_trait]
impl MetricPublisher for LogOnlyMetricPublisher {
    async fn publish(&self, sample: &BacklogMetricSample) -> Result<PublishReceipt, SampleError> {
        let value = wire_value(sample.value);
        info!(
            metric_name = %sample.metric_name,
            value = value,
            unit = %sample.unit,
            undefined = sample.value.is_undefined(),
            "Metric sample (dry-run, not published)"
        );
        Ok(PublishReceipt {
            published_value: value,
            timestamp: sample.timestamp,
        })
    }
}
