//! Worker count reader trait and HTTP implementation
//!
//! Fetches the running-worker count for one service in one cluster from the
//! orchestration service registry. An empty service list is `ServiceNotFound`,
//! which is a distinct failure from a service running zero workers.

use crate::error::SampleError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// Point-in-time reading of one service's running worker count
#[derive(Debug, Clone)]
pub struct WorkerSnapshot {
    pub cluster_id: String,
    pub service_id: String,
    pub running_count: u64,
    pub sampled_at: DateTime<Utc>,
}

/// Reads the current running-worker count for a cluster/service pair
#[async_trait]
pub trait WorkerCountReader: Send + Sync {
    async fn running_workers(
        &self,
        cluster_id: &str,
        service_id: &str,
    ) -> Result<WorkerSnapshot, SampleError>;
}

#[derive(Debug, Deserialize)]
struct DescribeServicesResponse {
    services: Vec<ServiceEntry>,
}

#[derive(Debug, Deserialize)]
struct ServiceEntry {
    service_id: String,
    running_count: i64,
}

/// HTTP orchestrator client - queries the service registry API
pub struct HttpOrchestratorClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpOrchestratorClient {
    /// Create a new orchestrator client with a per-call timeout
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, SampleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SampleError::ServiceUnavailable {
                cluster_id: String::new(),
                service_id: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn unavailable(&self, cluster_id: &str, service_id: &str, reason: String) -> SampleError {
        error!(
            cluster_id = %cluster_id,
            service_id = %service_id,
            reason = %reason,
            "Could not get running workers for service"
        );
        SampleError::ServiceUnavailable {
            cluster_id: cluster_id.to_string(),
            service_id: service_id.to_string(),
            reason,
        }
    }
}

#[async_trait]
impl WorkerCountReader for HttpOrchestratorClient {
    async fn running_workers(
        &self,
        cluster_id: &str,
        service_id: &str,
    ) -> Result<WorkerSnapshot, SampleError> {
        let url = format!(
            "{}/clusters/{}/services/{}",
            self.base_url, cluster_id, service_id
        );
        debug!(cluster_id = %cluster_id, service_id = %service_id, url = %url, "Describing service");

        let response = self.client.get(&url).send().await.map_err(|e| {
            self.unavailable(cluster_id, service_id, format!("request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(self.unavailable(
                cluster_id,
                service_id,
                format!("backend returned status {}", status),
            ));
        }

        let described: DescribeServicesResponse = response.json().await.map_err(|e| {
            self.unavailable(cluster_id, service_id, format!("invalid response body: {}", e))
        })?;

        // An empty or non-matching service list means the service does not
        // exist, which must not be confused with a zero running count.
        let entry = described
            .services
            .iter()
            .find(|s| s.service_id == service_id)
            .ok_or_else(|| {
                error!(
                    cluster_id = %cluster_id,
                    service_id = %service_id,
                    "Service not present in registry response"
                );
                SampleError::ServiceNotFound {
                    cluster_id: cluster_id.to_string(),
                    service_id: service_id.to_string(),
                }
            })?;

        if entry.running_count < 0 {
            return Err(SampleError::ComputationInvalid {
                reason: format!(
                    "service {} reported negative running count {}",
                    service_id, entry.running_count
                ),
            });
        }

        Ok(WorkerSnapshot {
            cluster_id: cluster_id.to_string(),
            service_id: service_id.to_string(),
            running_count: entry.running_count as u64,
            sampled_at: Utc::now(),
        })
    }
}
