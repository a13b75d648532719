//! Vectorizer trait

use async_trait::async_trait;
use tweetwatch_core::{FeatureVector, Result};

/// Maps raw text onto the fixed feature space a classifier was trained on
#[async_trait]
pub trait Vectorizer: Send + Sync {
    /// Transform one document into a feature vector
    async fn transform(&self, text: &str) -> Result<FeatureVector>;

    /// Dimensionality of every vector this vectorizer produces
    fn dimension(&self) -> usize;

    /// Get the vectorizer name
    fn name(&self) -> &str;
}
