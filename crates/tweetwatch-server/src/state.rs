use crate::config::ServerConfig;
use crate::templates::Templates;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;
use tweetwatch_classifiers::{load_artifacts, Predictor};
use tweetwatch_core::Result;

/// Application state shared across all requests
///
/// Everything here is read-only once serving starts.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServerConfig>,

    /// Vectorizer + classifier pair
    pub predictor: Arc<Predictor>,

    /// Parsed page templates
    pub templates: Arc<Templates>,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: ServerConfig,
        predictor: Predictor,
        templates: Templates,
        metrics_handle: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            predictor: Arc::new(predictor),
            templates: Arc::new(templates),
            metrics_handle,
        }
    }

    /// Load artifacts and templates. Must succeed before the server binds.
    pub fn initialize(config: ServerConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        info!(
            "Loading artifacts: classifier={}, vectorizer={}",
            config.artifacts.classifier.display(),
            config.artifacts.vectorizer.display()
        );
        let artifacts = load_artifacts(&config.artifacts)?;
        let predictor = Predictor::from_artifacts(artifacts);

        let templates = Templates::load()?;
        info!("Templates loaded");

        Ok(Self::new(config, predictor, templates, metrics_handle))
    }
}
