//! Backlog sampler binary - one read-compute-publish pass per invocation

use backlog_sampler::{
    Config, HttpMetricsClient, HttpOrchestratorClient, HttpQueueClient, LogOnlyMetricPublisher,
    MetricPublisher, SamplingJob,
};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse_config();

    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    }

    info!("Starting backlog sampler");
    info!("Configuration:");
    info!("  Queue API: {}", config.queue_api_url);
    info!("  Orchestrator API: {}", config.orchestrator_api_url);
    info!("  Metrics API: {}", config.metrics_api_url);
    info!("  Queue: {} ({})", config.queue_id, config.queue_display_name);
    info!("  Service: {}/{}", config.cluster_id, config.service_id);
    info!("  Namespace: {}", config.metric_namespace);
    info!("  Timeout: {}s", config.request_timeout_secs);
    info!("  Dry-run: {}", config.dry_run);

    let queue_reader = Arc::new(HttpQueueClient::new(
        config.queue_api_url.clone(),
        config.request_timeout_secs,
    )?);
    let worker_reader = Arc::new(HttpOrchestratorClient::new(
        config.orchestrator_api_url.clone(),
        config.request_timeout_secs,
    )?);

    if config.dry_run {
        info!("Using log-only metric publisher (dry-run mode)");
        let publisher = Arc::new(LogOnlyMetricPublisher);
        run_once(config, queue_reader, worker_reader, publisher).await
    } else {
        let publisher = Arc::new(HttpMetricsClient::new(
            config.metrics_api_url.clone(),
            config.metric_namespace.clone(),
            config.request_timeout_secs,
        )?);
        run_once(config, queue_reader, worker_reader, publisher).await
    }
}

/// Run one sampling pass, aborting cleanly on interrupt
async fn run_once<P: MetricPublisher + 'static>(
    config: Config,
    queue_reader: Arc<HttpQueueClient>,
    worker_reader: Arc<HttpOrchestratorClient>,
    publisher: Arc<P>,
) -> anyhow::Result<()> {
    let job = SamplingJob::new(config, queue_reader, worker_reader, publisher);

    tokio::select! {
        result = job.run() => match result {
            Ok(outcome) => {
                info!(
                    published_value = outcome.receipt.published_value,
                    "Backlog sample published"
                );
                Ok(())
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "Sampling invocation failed");
                Err(e.into())
            }
        },
        _ = tokio::signal::ctrl_c() => {
            // Abort without publishing a partial sample; the external
            // scheduler retries with a fresh invocation.
            error!("Interrupted, aborting sampling invocation");
            anyhow::bail!("interrupted before sample was published")
        }
    }
}
