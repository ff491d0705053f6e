//! Integration tests for the backlog sampler
//!
//! Stubs the three HTTP backends (queue service, orchestrator registry,
//! metrics backend) with wiremock and drives full sampling passes through
//! the library surface.

use backlog_sampler::{
    Config, HttpMetricsClient, HttpOrchestratorClient, HttpQueueClient, QueueDepthReader,
    SampleError, SamplingJob, WorkerCountReader, UNDEFINED_BACKLOG_VALUE,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server_uri: &str) -> Config {
    Config {
        queue_api_url: server_uri.to_string(),
        orchestrator_api_url: server_uri.to_string(),
        metrics_api_url: server_uri.to_string(),
        queue_id: "orders".to_string(),
        queue_display_name: "orders-prod".to_string(),
        cluster_id: "prod".to_string(),
        service_id: "order-workers".to_string(),
        metric_namespace: "Messages/Tasks".to_string(),
        request_timeout_secs: 5,
        dry_run: false,
        log_json: false,
    }
}

fn job_against(server: &MockServer) -> SamplingJob<HttpQueueClient, HttpOrchestratorClient, HttpMetricsClient> {
    let config = test_config(&server.uri());
    let queue_reader = Arc::new(HttpQueueClient::new(config.queue_api_url.clone(), 5).unwrap());
    let worker_reader =
        Arc::new(HttpOrchestratorClient::new(config.orchestrator_api_url.clone(), 5).unwrap());
    let publisher = Arc::new(
        HttpMetricsClient::new(
            config.metrics_api_url.clone(),
            config.metric_namespace.clone(),
            5,
        )
        .unwrap(),
    );
    SamplingJob::new(config, queue_reader, worker_reader, publisher)
}

async fn stub_queue_depth(server: &MockServer, count: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/queues/orders/attributes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "approximate_message_count": count })),
        )
        .mount(server)
        .await;
}

async fn stub_running_workers(server: &MockServer, running: i64) {
    Mock::given(method("GET"))
        .and(path("/clusters/prod/services/order-workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "services": [{ "service_id": "order-workers", "running_count": running }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_scenario_a_ratio_published_with_dimensions() {
    let server = MockServer::start().await;
    stub_queue_depth(&server, json!("100")).await;
    stub_running_workers(&server, 5).await;

    Mock::given(method("POST"))
        .and(path("/metrics"))
        .and(body_partial_json(json!({
            "namespace": "Messages/Tasks",
            "metric_name": "BacklogPerTask",
            "value": 20.0,
            "unit": "Count",
            "dimensions": [
                { "name": "QueueName", "value": "orders-prod" },
                { "name": "ServiceName", "value": "order-workers" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = job_against(&server).run().await.unwrap();
    assert_eq!(outcome.receipt.published_value, 20.0);
}

#[tokio::test]
async fn test_scenario_b_idle_queue_zero_workers_publishes_zero() {
    let server = MockServer::start().await;
    stub_queue_depth(&server, json!(0)).await;
    stub_running_workers(&server, 0).await;

    Mock::given(method("POST"))
        .and(path("/metrics"))
        .and(body_partial_json(json!({ "value": 0.0 })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = job_against(&server).run().await.unwrap();
    assert_eq!(outcome.receipt.published_value, 0.0);
}

#[tokio::test]
async fn test_scenario_c_backlog_without_workers_publishes_sentinel() {
    let server = MockServer::start().await;
    stub_queue_depth(&server, json!("50")).await;
    stub_running_workers(&server, 0).await;

    Mock::given(method("POST"))
        .and(path("/metrics"))
        .and(body_partial_json(json!({ "value": UNDEFINED_BACKLOG_VALUE })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = job_against(&server).run().await.unwrap();
    assert!(outcome.sample.value.is_undefined());
    // Verifiably different from the scenario-B datapoint
    assert_ne!(outcome.receipt.published_value, 0.0);
}

#[tokio::test]
async fn test_scenario_d_queue_failure_publishes_nothing() {
    let server = MockServer::start().await;
    // Queue backend drops the request; orchestrator would succeed
    Mock::given(method("GET"))
        .and(path("/queues/orders/attributes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    stub_running_workers(&server, 5).await;

    Mock::given(method("POST"))
        .and(path("/metrics"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = job_against(&server).run().await.unwrap_err();
    assert!(matches!(err, SampleError::QueueUnavailable { queue_id, .. } if queue_id == "orders"));
}

#[tokio::test]
async fn test_nonexistent_queue_is_unavailable_not_fabricated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/queues/no-such-queue/attributes"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = HttpQueueClient::new(server.uri(), 5).unwrap();
    let err = client.queue_depth("no-such-queue").await.unwrap_err();
    assert!(matches!(err, SampleError::QueueUnavailable { .. }));
}

#[tokio::test]
async fn test_missing_service_entry_is_not_found_not_zero() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clusters/prod/services/order-workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "services": [] })))
        .mount(&server)
        .await;

    let client = HttpOrchestratorClient::new(server.uri(), 5).unwrap();
    let err = client
        .running_workers("prod", "order-workers")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SampleError::ServiceNotFound { cluster_id, service_id }
            if cluster_id == "prod" && service_id == "order-workers"
    ));
}

#[tokio::test]
async fn test_orchestrator_outage_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clusters/prod/services/order-workers"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = HttpOrchestratorClient::new(server.uri(), 5).unwrap();
    let err = client
        .running_workers("prod", "order-workers")
        .await
        .unwrap_err();
    assert!(matches!(err, SampleError::ServiceUnavailable { .. }));
}

#[tokio::test]
async fn test_metrics_backend_error_is_publish_failed() {
    let server = MockServer::start().await;
    stub_queue_depth(&server, json!("10")).await;
    stub_running_workers(&server, 2).await;

    Mock::given(method("POST"))
        .and(path("/metrics"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = job_against(&server).run().await.unwrap_err();
    assert!(matches!(err, SampleError::PublishFailed { .. }));
}

#[tokio::test]
async fn test_negative_reported_count_is_computation_invalid() {
    let server = MockServer::start().await;
    stub_queue_depth(&server, json!("-3")).await;

    let client = HttpQueueClient::new(server.uri(), 5).unwrap();
    let err = client.queue_depth("orders").await.unwrap_err();
    assert!(matches!(err, SampleError::ComputationInvalid { .. }));
}
