//! Configuration for the backlog sampler

use clap::Parser;
use std::env;

/// Configuration for one backlog sampling invocation
#[derive(Debug, Clone, Parser)]
#[command(name = "backlog-sampler")]
#[command(about = "Samples queue depth and worker count, publishes backlog-per-task")]
pub struct Config {
    /// Queue service API base URL
    #[arg(long, env)]
    pub queue_api_url: String,

    /// Orchestration service registry API base URL
    #[arg(long, env)]
    pub orchestrator_api_url: String,

    /// Metrics backend API base URL
    #[arg(long, env)]
    pub metrics_api_url: String,

    /// Queue identifier to sample
    #[arg(long, env)]
    pub queue_id: String,

    /// Display name used for the QueueName metric dimension
    #[arg(long, env)]
    pub queue_display_name: String,

    /// Cluster identifier the worker service runs in
    #[arg(long, env)]
    pub cluster_id: String,

    /// Worker service identifier
    #[arg(long, env)]
    pub service_id: String,

    /// Namespace the metric datapoint is published under
    #[arg(long, env, default_value = "Messages/Tasks")]
    pub metric_namespace: String,

    /// Per-call timeout for all backend requests, in seconds
    #[arg(long, env, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Dry-run mode (compute and log the sample, skip publishing)
    #[arg(long, env)]
    pub dry_run: bool,

    /// Output logs in JSON format
    #[arg(long, env)]
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            queue_api_url: env::var("QUEUE_API_URL")
                .unwrap_or_else(|_| "http://localhost:8081".to_string()),
            orchestrator_api_url: env::var("ORCHESTRATOR_API_URL")
                .unwrap_or_else(|_| "http://localhost:8082".to_string()),
            metrics_api_url: env::var("METRICS_API_URL")
                .unwrap_or_else(|_| "http://localhost:8083".to_string()),
            queue_id: env::var("QUEUE_ID").unwrap_or_default(),
            queue_display_name: env::var("QUEUE_DISPLAY_NAME").unwrap_or_default(),
            cluster_id: env::var("CLUSTER_ID").unwrap_or_default(),
            service_id: env::var("SERVICE_ID").unwrap_or_default(),
            metric_namespace: env::var("METRIC_NAMESPACE")
                .unwrap_or_else(|_| "Messages/Tasks".to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            dry_run: env::var("DRY_RUN")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            log_json: env::var("LOG_JSON")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
        }
    }
}

impl Config {
    /// Parse configuration from command-line args and environment variables
    pub fn parse_config() -> Self {
        Config::parse()
    }
}
