//! Classifier trait and common types

use async_trait::async_trait;
use tweetwatch_core::{FeatureVector, Label, Result};

/// Trait for binary classifiers operating on vectorized text
#[async_trait]
pub trait BinaryClassifier: Send + Sync {
    /// Classify a feature vector produced by the matching vectorizer
    async fn classify(&self, features: &FeatureVector) -> Result<ClassificationResult>;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of classification
#[derive(Debug, Clone)]
pub struct ClassificationResult {
    /// Predicted label
    pub label: Label,

    /// Probability of the disaster class (0.0-1.0)
    pub score: f64,

    /// Additional metadata
    pub metadata: ClassificationMetadata,

    /// Latency in microseconds
    pub latency_us: u64,
}

impl ClassificationResult {
    /// Create a new classification result
    pub fn new(label: Label, score: f64) -> Self {
        Self {
            label,
            score,
            metadata: ClassificationMetadata::default(),
            latency_us: 0,
        }
    }
}

/// Metadata about classification
#[derive(Debug, Clone, Default)]
pub struct ClassificationMetadata {
    /// Model name or version
    pub model: Option<String>,

    /// Raw decision value before the link function
    pub decision: Option<f64>,

    /// Additional key-value pairs
    pub extra: Vec<(String, String)>,
}
