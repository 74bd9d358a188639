use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the Prometheus recorder and describe all metrics
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "token_counter_requests_total",
        "Total number of prompt requests by outcome"
    );
    describe_counter!(
        "token_counter_tokens_total",
        "Total number of tokens counted"
    );
    describe_counter!(
        "token_counter_cost_micro_usd_total",
        "Accumulated cost in micro-dollars"
    );
    describe_histogram!(
        "token_counter_request_duration_seconds",
        "Prompt request duration in seconds"
    );
    describe_counter!(
        "token_counter_errors_total",
        "Total number of failed prompt requests by error kind"
    );
    describe_gauge!(
        "token_counter_info",
        "Service version information"
    );

    gauge!("token_counter_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a finished prompt request
pub fn record_request(model: &str, outcome: &str) {
    counter!(
        "token_counter_requests_total",
        "model" => model.to_string(),
        "outcome" => outcome.to_string(),
    )
    .increment(1);
}

/// Record token usage; `direction` is "input" or "output"
pub fn record_tokens(model: &str, direction: &str, count: u64) {
    counter!(
        "token_counter_tokens_total",
        "model" => model.to_string(),
        "direction" => direction.to_string(),
    )
    .increment(count);
}

pub fn record_cost(model: &str, micros: u64) {
    counter!(
        "token_counter_cost_micro_usd_total",
        "model" => model.to_string(),
    )
    .increment(micros);
}

pub fn record_duration(model: &str, duration: Duration) {
    histogram!(
        "token_counter_request_duration_seconds",
        "model" => model.to_string(),
    )
    .record(duration.as_secs_f64());
}

pub fn record_error(kind: &str) {
    counter!(
        "token_counter_errors_total",
        "kind" => kind.to_string(),
    )
    .increment(1);
}
