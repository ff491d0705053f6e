//! Domain error taxonomy for the sampling pipeline
//!
//! Backend-specific error types (reqwest, serde_json) never cross a client
//! wrapper: each wrapper logs at the boundary and converts into one of these
//! kinds, so callers only ever match on domain failures.

use thiserror::Error;

/// Failure kinds a single sampling invocation can surface
#[derive(Error, Debug)]
pub enum SampleError {
    #[error("queue unavailable - {queue_id}: {reason}")]
    QueueUnavailable { queue_id: String, reason: String },

    #[error("service not found - {service_id} in cluster {cluster_id}")]
    ServiceNotFound {
        cluster_id: String,
        service_id: String,
    },

    #[error("service unavailable - {service_id} in cluster {cluster_id}: {reason}")]
    ServiceUnavailable {
        cluster_id: String,
        service_id: String,
        reason: String,
    },

    #[error("computation invalid: {reason}")]
    ComputationInvalid { reason: String },

    #[error("publish failed - {metric_name}: {reason}")]
    PublishFailed {
        metric_name: String,
        reason: String,
    },
}

impl SampleError {
    /// Stable kind label for logs and exit reporting
    pub fn kind(&self) -> &'static str {
        match self {
            SampleError::QueueUnavailable { .. } => "queue_unavailable",
            SampleError::ServiceNotFound { .. } => "service_not_found",
            SampleError::ServiceUnavailable { .. } => "service_unavailable",
            SampleError::ComputationInvalid { .. } => "computation_invalid",
            SampleError::PublishFailed { .. } => "publish_failed",
        }
    }
}
