//! Backlog Sampler - publishes the backlog-per-task autoscaling signal
//!
//! One invocation reads the approximate depth of a named queue and the
//! running-worker count of a named service, divides one by the other, and
//! publishes the ratio as a single metric datapoint. A downstream autoscaling
//! policy consumes the metric; this crate only produces the signal.

pub mod compute;
pub mod config;
pub mod error;
pub mod publish;
pub mod queue;
pub mod sampler;
pub mod workers;

pub use compute::{compute_backlog, BacklogMetricSample, BacklogValue, Dimension};
pub use config::Config;
pub use error::SampleError;
pub use publish::{
    HttpMetricsClient, LogOnlyMetricPublisher, MetricPublisher, PublishReceipt,
    UNDEFINED_BACKLOG_VALUE,
};
pub use queue::{HttpQueueClient, QueueDepthReader, QueueSnapshot};
pub use sampler::{SampleOutcome, SamplingJob};
pub use workers::{HttpOrchestratorClient, WorkerCountReader, WorkerSnapshot};
