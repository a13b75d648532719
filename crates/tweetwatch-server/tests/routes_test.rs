//! Integration tests for the tweetwatch HTTP surface

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use tweetwatch_classifiers::{
    LogisticArtifact, LogisticRegression, Predictor, TfidfArtifact, TfidfVectorizer, Vectorizer,
};
use tweetwatch_core::{FeatureVector, Result};
use tweetwatch_server::{create_router, AppState, ServerConfig, Templates};

/// Delegates to a real vectorizer while counting calls
struct CountingVectorizer {
    inner: TfidfVectorizer,
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl Vectorizer for CountingVectorizer {
    async fn transform(&self, text: &str) -> Result<FeatureVector> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.inner.transform(text).await
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

struct TestApp {
    router: Router,
    vectorizer_calls: Arc<AtomicU32>,
}

fn test_app(echo_text: bool) -> TestApp {
    let vocabulary: HashMap<String, usize> = ["earthquake", "fire", "sunny", "park", "massive"]
        .iter()
        .enumerate()
        .map(|(i, t)| (t.to_string(), i))
        .collect();
    let mut artifact = TfidfArtifact::new(vocabulary, vec![2.1, 1.8, 2.4, 2.0, 1.5]);
    artifact.max_input_bytes = 64;

    let calls = Arc::new(AtomicU32::new(0));
    let vectorizer = CountingVectorizer {
        inner: TfidfVectorizer::from_artifact(artifact).unwrap(),
        calls: calls.clone(),
    };
    let classifier = LogisticRegression::from_artifact(LogisticArtifact {
        coef: vec![3.2, 2.7, -2.9, -1.6, 0.8],
        intercept: -0.4,
        classes: vec![0, 1],
    })
    .unwrap();

    let config = ServerConfig {
        echo_text,
        ..Default::default()
    };
    let state = AppState::new(
        config,
        Predictor::new(Arc::new(vectorizer), Arc::new(classifier)),
        Templates::load().unwrap(),
        None,
    );

    TestApp {
        router: create_router(state),
        vectorizer_calls: calls,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn post_form(router: &Router, body: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn post_raw(
    router: &Router,
    content_type: Option<&str>,
    body: impl Into<Body>,
) -> (StatusCode, String) {
    let mut request = Request::builder().method("POST").uri("/predict");
    if let Some(content_type) = content_type {
        request = request.header(header::CONTENT_TYPE, content_type);
    }
    send(router, request.body(body.into()).unwrap()).await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

#[tokio::test]
async fn test_index_renders_form() {
    let app = test_app(true);
    let (status, body) = get(&app.router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"name="tweet_text""#));
    assert!(!body.contains("Please provide tweet text."));
}

#[tokio::test]
async fn test_empty_text_is_rejected_without_inference() {
    let app = test_app(true);

    for form in ["tweet_text=", "", "other=fire"] {
        let (status, body) = post_form(&app.router, form).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "form {form:?}");
        assert!(body.contains("Please provide tweet text."));
        assert!(body.contains(r#"name="tweet_text""#));
    }

    assert_eq!(app.vectorizer_calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_unreadable_body_gets_guidance_page() {
    let app = test_app(true);

    let (status, body) = post_raw(&app.router, None, Body::empty()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Please provide tweet text."));
    assert!(body.contains(r#"name="tweet_text""#));

    let multipart = "--XyZ\r\nContent-Disposition: form-data; name=\"tweet_text\"\r\n\r\nfire\r\n--XyZ--\r\n";
    let (status, body) = post_raw(
        &app.router,
        Some("multipart/form-data; boundary=XyZ"),
        multipart,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Please provide tweet text."));

    let (status, body) = post_raw(&app.router, Some("text/plain"), "tweet_text=fire").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Please provide tweet text."));

    assert_eq!(app.vectorizer_calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_repeated_field_uses_first_value() {
    let app = test_app(true);

    let (status, body) = post_form(&app.router, "tweet_text=earthquake&tweet_text=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This tweet indicates a disaster."));

    let (status, body) = post_form(&app.router, "tweet_text=&tweet_text=earthquake").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Please provide tweet text."));

    assert_eq!(app.vectorizer_calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_whitespace_only_text_is_classified() {
    let app = test_app(true);
    let (status, body) = post_form(&app.router, "tweet_text=+++").await;

    // no vocabulary terms, so only the intercept decides
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This tweet does not indicate a disaster."));
    assert!(!body.contains("Please provide tweet text."));
    assert_eq!(app.vectorizer_calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_oversized_body_renders_error_page() {
    let app = test_app(true);
    let body = format!("tweet_text={}", "a".repeat(70 * 1024));
    let (status, body) = post_form(&app.router, &body).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body.contains("An error occurred during prediction."));
    assert!(body.contains(r#"name="tweet_text""#));
    assert_eq!(app.vectorizer_calls.load(Ordering::Relaxed), 0);
}

#[tokio::test]
async fn test_disaster_tweet() {
    let app = test_app(true);
    let (status, body) = post_form(
        &app.router,
        "tweet_text=There+is+a+massive+earthquake+downtown",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This tweet indicates a disaster."));
    assert!(body.contains("There is a massive earthquake downtown"));
    assert_eq!(app.vectorizer_calls.load(Ordering::Relaxed), 1);
}

#[tokio::test]
async fn test_non_disaster_tweet() {
    let app = test_app(true);
    let (status, body) =
        post_form(&app.router, "tweet_text=I+love+sunny+days+at+the+park").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This tweet does not indicate a disaster."));
    assert!(!body.contains("This tweet indicates a disaster."));
}

#[tokio::test]
async fn test_echo_can_be_disabled() {
    let app = test_app(false);
    let (status, body) = post_form(&app.router, "tweet_text=forest+fire+near+la+ronge").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This tweet indicates a disaster."));
    assert!(!body.contains("forest fire near la ronge"));
}

#[tokio::test]
async fn test_user_text_is_escaped() {
    let app = test_app(true);
    let (_, body) = post_form(&app.router, "tweet_text=%3Cb%3Efire%3C%2Fb%3E").await;

    assert!(body.contains("&lt;b&gt;fire&lt;/b&gt;"));
    assert!(!body.contains("<b>fire</b>"));
}

#[tokio::test]
async fn test_inference_failure_then_recovery() {
    let app = test_app(true);

    // longer than the vectorizer's input limit
    let oversized = format!("tweet_text={}", "fire+".repeat(20));
    let (status, body) = post_form(&app.router, &oversized).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("An error occurred during prediction."));
    assert!(!body.contains("byte limit"));

    let (status, body) = post_form(&app.router, "tweet_text=earthquake").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("This tweet indicates a disaster."));
}

#[tokio::test]
async fn test_same_text_same_result() {
    let app = test_app(true);

    let (_, first) = post_form(&app.router, "tweet_text=fire+in+the+park").await;
    for _ in 0..5 {
        let (_, again) = post_form(&app.router, "tweet_text=fire+in+the+park").await;
        assert_eq!(again, first);
    }
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app(true);
    let (status, body) = get(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_metrics_without_recorder() {
    let app = test_app(true);
    let (status, body) = get(&app.router, "/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let app = test_app(true);

    let (status, _) = get(&app.router, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app.router, "/predict").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
