//! Tweetwatch Classifiers
//!
//! Loads the pre-trained disaster tweet artifacts and runs inference with them.
//!
//! - `artifact`: reads the vectorizer and classifier documents from disk, once
//! - `tfidf`: the fitted TF-IDF vectorizer
//! - `logistic`: the trained logistic regression classifier
//! - `predictor`: the request-level prediction step shared by all handlers

pub mod artifact;
pub mod classifier;
pub mod logistic;
pub mod predictor;
pub mod tfidf;
pub mod vectorizer;

pub use artifact::{load_artifacts, load_classifier, load_vectorizer, ArtifactPaths, Artifacts};
pub use classifier::{BinaryClassifier, ClassificationMetadata, ClassificationResult};
pub use logistic::{LogisticArtifact, LogisticRegression};
pub use predictor::{PredictError, Predictor};
pub use tfidf::{Norm, TfidfArtifact, TfidfVectorizer};
pub use vectorizer::Vectorizer;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::artifact::{load_artifacts, ArtifactPaths, Artifacts};
    pub use crate::classifier::{BinaryClassifier, ClassificationResult};
    pub use crate::predictor::{PredictError, Predictor};
    pub use crate::vectorizer::Vectorizer;
}
