//! Backlog-per-task computation
//!
//! Pure combination of one queue snapshot and one worker snapshot into a
//! dimensioned metric sample. The zero-worker cases are the one real policy
//! decision in this system: zero messages with zero workers is a backlog of
//! zero, while pending messages with zero workers is unbounded pressure and
//! must stay distinguishable from zero downstream.

use crate::queue::QueueSnapshot;
use crate::workers::WorkerSnapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metric name under which every sample is published
pub const METRIC_NAME: &str = "BacklogPerTask";

/// Unit attached to every sample
pub const METRIC_UNIT: &str = "Count";

/// Computed backlog ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BacklogValue {
    Finite(f64),
    /// Pending messages but no running workers; division is undefined
    Undefined,
}

impl BacklogValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, BacklogValue::Undefined)
    }
}

/// One metric dimension (name, value) pair
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

/// Immutable, fully-formed metric sample ready for publishing
#[derive(Debug, Clone)]
pub struct BacklogMetricSample {
    pub metric_name: &'static str,
    pub dimensions: Vec<Dimension>,
    pub value: BacklogValue,
    pub unit: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Combine two same-invocation snapshots into a backlog-per-task sample
pub fn compute_backlog(
    queue: &QueueSnapshot,
    workers: &WorkerSnapshot,
    queue_display_name: &str,
) -> BacklogMetricSample {
    let messages = queue.approximate_message_count;
    let running = workers.running_count;

    let value = if running > 0 {
        BacklogValue::Finite(messages as f64 / running as f64)
    } else if messages == 0 {
        BacklogValue::Finite(0.0)
    } else {
        BacklogValue::Undefined
    };

    BacklogMetricSample {
        metric_name: METRIC_NAME,
        dimensions: vec![
            Dimension {
                name: "QueueName".to_string(),
                value: queue_display_name.to_string(),
            },
            Dimension {
                name: "ServiceName".to_string(),
                value: workers.service_id.clone(),
            },
        ],
        value,
        unit: METRIC_UNIT,
        timestamp: queue.sampled_at.max(workers.sampled_at),
    }
}
