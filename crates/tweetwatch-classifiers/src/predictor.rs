//! Prediction step behind the `/predict` handler
//!
//! Refuses empty input, then runs vectorize → classify → label message.
//! Failures come back as a `PredictError` instead of unwinding into the caller.

use crate::artifact::Artifacts;
use crate::classifier::BinaryClassifier;
use crate::vectorizer::Vectorizer;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};
use tweetwatch_core::{Error, Prediction};

/// Why a prediction did not produce a label
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// No text (absent or empty) was submitted
    #[error("no tweet text provided")]
    MissingInput,

    /// Vectorization or classification failed
    #[error("prediction failed: {0}")]
    Inference(#[from] Error),
}

impl PredictError {
    /// Message shown to the user; never carries internal details
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingInput => "Please provide tweet text.",
            Self::Inference(_) => "An error occurred during prediction.",
        }
    }
}

/// Runs predictions against a shared, read-only artifact pair
#[derive(Clone)]
pub struct Predictor {
    vectorizer: Arc<dyn Vectorizer>,
    classifier: Arc<dyn BinaryClassifier>,
}

impl Predictor {
    pub fn new(vectorizer: Arc<dyn Vectorizer>, classifier: Arc<dyn BinaryClassifier>) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }

    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self::new(artifacts.vectorizer, artifacts.classifier)
    }

    /// Classify one submitted text
    pub async fn predict(&self, input: Option<&str>) -> Result<Prediction, PredictError> {
        let text = match input {
            Some(text) if !text.is_empty() => text,
            _ => return Err(PredictError::MissingInput),
        };

        let start = Instant::now();

        let result = self.run(text).await;
        match result {
            Ok((label, probability)) => Ok(Prediction {
                label,
                message: label.message().to_string(),
                text: text.to_string(),
                probability,
                latency_us: start.elapsed().as_micros() as u64,
            }),
            Err(e) => {
                error!(
                    vectorizer = self.vectorizer.name(),
                    classifier = self.classifier.name(),
                    "Prediction error: {e}"
                );
                Err(PredictError::Inference(e))
            }
        }
    }

    async fn run(&self, text: &str) -> tweetwatch_core::Result<(tweetwatch_core::Label, f64)> {
        let features = self.vectorizer.transform(text).await?;
        debug!(
            dim = features.dim(),
            nnz = features.nnz(),
            "Tweet vectorized"
        );

        let result = self.classifier.classify(&features).await?;
        debug!(
            label = %result.label,
            score = result.score,
            latency_us = result.latency_us,
            "Tweet classified"
        );

        Ok((result.label, result.score))
    }
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("vectorizer", &self.vectorizer.name())
            .field("classifier", &self.classifier.name())
            .finish()
    }
}
