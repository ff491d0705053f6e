//! Sampling job - one read-compute-publish pass
//!
//! Strictly linear: read queue depth, read running workers, compute the
//! ratio, publish. The first failing step aborts the run and nothing partial
//! is published. A failed run is retried only by the external scheduler as a
//! brand-new invocation.

use crate::compute::{compute_backlog, BacklogMetricSample};
use crate::config::Config;
use crate::error::SampleError;
use crate::publish::{MetricPublisher, PublishReceipt};
use crate::queue::QueueDepthReader;
use crate::workers::WorkerCountReader;
use std::sync::Arc;
use tracing::info;

/// Result of one successful sampling pass
#[derive(Debug)]
pub struct SampleOutcome {
    pub sample: BacklogMetricSample,
    pub receipt: PublishReceipt,
}

/// Orchestrates one sampling pass over the three backend clients
pub struct SamplingJob<Q: QueueDepthReader, W: WorkerCountReader, P: MetricPublisher> {
    config: Config,
    queue_reader: Arc<Q>,
    worker_reader: Arc<W>,
    publisher: Arc<P>,
}

impl<Q: QueueDepthReader, W: WorkerCountReader, P: MetricPublisher> SamplingJob<Q, W, P> {
    /// Create a new sampling job; clients are constructed once at process
    /// start and reused across invocations
    pub fn new(
        config: Config,
        queue_reader: Arc<Q>,
        worker_reader: Arc<W>,
        publisher: Arc<P>,
    ) -> Self {
        Self {
            config,
            queue_reader,
            worker_reader,
            publisher,
        }
    }

    /// Run one pass: read queue -> read workers -> compute -> publish
    pub async fn run(&self) -> Result<SampleOutcome, SampleError> {
        let queue = self.queue_reader.queue_depth(&self.config.queue_id).await?;
        info!(
            queue_id = %queue.queue_id,
            approximate_message_count = queue.approximate_message_count,
            "Read queue depth"
        );

        let workers = self
            .worker_reader
            .running_workers(&self.config.cluster_id, &self.config.service_id)
            .await?;
        info!(
            cluster_id = %workers.cluster_id,
            service_id = %workers.service_id,
            running_count = workers.running_count,
            "Read running worker count"
        );

        let sample = compute_backlog(&queue, &workers, &self.config.queue_display_name);
        let receipt = self.publisher.publish(&sample).await?;

        info!(
            metric_name = %sample.metric_name,
            published_value = receipt.published_value,
            "Sampling pass complete"
        );

        Ok(SampleOutcome { sample, receipt })
    }
}
