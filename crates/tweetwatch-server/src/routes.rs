//! HTTP routes and handlers

use axum::{
    extract::{rejection::FormRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};
use tweetwatch_classifiers::PredictError;
use tweetwatch_core::Error;

use crate::state::AppState;

/// Upper bound on request bodies; the vectorizer applies its own text limit
const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .fallback(fallback)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Name of the text field on the index page form
const TWEET_FIELD: &str = "tweet_text";

async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    Ok(Html(state.templates.render_index(None)?))
}

async fn predict(
    State(state): State<AppState>,
    form: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, AppError> {
    metrics::counter!("tweetwatch_requests_total").increment(1);

    // an unreadable body carries no tweet text; only an oversized one is an error
    let tweet_text = match form {
        Ok(Form(fields)) => first_field(fields, TWEET_FIELD),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            debug!("Rejected oversized request body: {rejection}");
            metrics::counter!("tweetwatch_errors_total", "kind" => "body_too_large").increment(1);
            let page = state
                .templates
                .render_index(Some("An error occurred during prediction."))?;
            return Ok((StatusCode::PAYLOAD_TOO_LARGE, Html(page)).into_response());
        }
        Err(rejection) => {
            debug!("Unreadable form body: {rejection}");
            None
        }
    };

    match state.predictor.predict(tweet_text.as_deref()).await {
        Ok(prediction) => {
            info!(
                label = %prediction.label,
                probability = prediction.probability,
                latency_us = prediction.latency_us,
                "Prediction complete"
            );
            metrics::counter!("tweetwatch_predictions_total", "label" => prediction.label.as_str())
                .increment(1);
            metrics::histogram!("tweetwatch_inference_latency_us")
                .record(prediction.latency_us as f64);

            let echoed = state
                .config
                .echo_text
                .then_some(prediction.text.as_str());
            let page = state.templates.render_result(prediction.label, echoed)?;
            Ok(Html(page).into_response())
        }
        Err(err) => {
            let (status, kind) = match &err {
                PredictError::MissingInput => {
                    debug!("Rejected request without tweet text");
                    (StatusCode::BAD_REQUEST, "missing_input")
                }
                // already logged by the predictor
                PredictError::Inference(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.kind()),
            };
            metrics::counter!("tweetwatch_errors_total", "kind" => kind).increment(1);

            let page = state.templates.render_index(Some(err.user_message()))?;
            Ok((status, Html(page)).into_response())
        }
    }
}

/// First value submitted under `name`; later repeats are ignored
fn first_field(fields: Vec<(String, String)>, name: &str) -> Option<String> {
    fields
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn metrics(State(state): State<AppState>) -> String {
    state
        .metrics_handle
        .as_ref()
        .map(|handle| handle.render())
        .unwrap_or_default()
}

async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

/// Failure to produce any page at all
#[derive(Debug)]
pub struct AppError(Error);

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Failed to render page: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while rendering the page.",
        )
            .into_response()
    }
}
