//! Logging and metrics bootstrap

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

/// Initialize tracing/logging
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("tweetwatch=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tweetwatch=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
pub fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "tweetwatch_requests_total",
        "Total number of prediction requests received"
    );
    metrics::describe_counter!(
        "tweetwatch_predictions_total",
        "Total number of predictions by label"
    );
    metrics::describe_counter!(
        "tweetwatch_errors_total",
        "Total number of failed prediction requests by kind"
    );
    metrics::describe_histogram!(
        "tweetwatch_inference_latency_us",
        metrics::Unit::Microseconds,
        "Vectorize + classify latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
