//! Artifact loading
//!
//! The vectorizer and classifier are serialized by the external training run.
//! Each document carries a `kind` and a `format_version` envelope next to its
//! payload. JSON and YAML are accepted, picked by file extension.

use crate::classifier::BinaryClassifier;
use crate::logistic::{LogisticArtifact, LogisticRegression};
use crate::tfidf::{TfidfArtifact, TfidfVectorizer};
use crate::vectorizer::Vectorizer;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tweetwatch_core::{Error, Result};

/// Only artifact format version this build understands
pub const FORMAT_VERSION: u32 = 1;

pub const VECTORIZER_KIND: &str = "tfidf_vectorizer";
pub const CLASSIFIER_KIND: &str = "logistic_regression";

/// Locations of the two artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPaths {
    /// Trained classifier
    #[serde(default = "default_classifier_path")]
    pub classifier: PathBuf,

    /// Fitted vectorizer
    #[serde(default = "default_vectorizer_path")]
    pub vectorizer: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            classifier: default_classifier_path(),
            vectorizer: default_vectorizer_path(),
        }
    }
}

fn default_classifier_path() -> PathBuf {
    PathBuf::from("Models/Logistic_Regression_model.json")
}

fn default_vectorizer_path() -> PathBuf {
    PathBuf::from("Models/tfidf_vectorizer.json")
}

/// The loaded, read-only artifact pair shared by every request
#[derive(Clone)]
pub struct Artifacts {
    pub vectorizer: Arc<dyn Vectorizer>,
    pub classifier: Arc<dyn BinaryClassifier>,
}

impl std::fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifacts")
            .field("vectorizer", &self.vectorizer.name())
            .field("dimension", &self.vectorizer.dimension())
            .field("classifier", &self.classifier.name())
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ArtifactHeader {
    kind: String,
    format_version: u32,
}

/// Load both artifacts. Any failure is fatal to startup.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<Artifacts> {
    let vectorizer = load_vectorizer(&paths.vectorizer)?;
    let classifier = load_classifier(&paths.classifier)?;

    info!(
        vectorizer = %paths.vectorizer.display(),
        classifier = %paths.classifier.display(),
        dimension = vectorizer.dimension(),
        vocabulary = vectorizer.vocabulary_size(),
        "Artifacts loaded"
    );

    if vectorizer.dimension() != classifier.dimension() {
        warn!(
            vectorizer = vectorizer.dimension(),
            classifier = classifier.dimension(),
            "Artifact dimensions differ; predictions will fail"
        );
    }

    Ok(Artifacts {
        vectorizer: Arc::new(vectorizer),
        classifier: Arc::new(classifier),
    })
}

/// Load a TF-IDF vectorizer artifact
pub fn load_vectorizer(path: impl AsRef<Path>) -> Result<TfidfVectorizer> {
    let artifact: TfidfArtifact = read_artifact(path.as_ref(), VECTORIZER_KIND)?;
    TfidfVectorizer::from_artifact(artifact)
}

/// Load a logistic regression artifact
pub fn load_classifier(path: impl AsRef<Path>) -> Result<LogisticRegression> {
    let artifact: LogisticArtifact = read_artifact(path.as_ref(), CLASSIFIER_KIND)?;
    LogisticRegression::from_artifact(artifact)
}

fn read_artifact<T: DeserializeOwned>(path: &Path, expected_kind: &str) -> Result<T> {
    debug!("Reading artifact {}", path.display());

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::artifact(format!("failed to read {}: {e}", path.display())))?;

    let document: serde_json::Value = match extension(path).as_deref() {
        Some("json") => serde_json::from_str(&content)
            .map_err(|e| Error::artifact(format!("corrupt artifact {}: {e}", path.display())))?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
            .map_err(|e| Error::artifact(format!("corrupt artifact {}: {e}", path.display())))?,
        other => {
            return Err(Error::artifact(format!(
                "unsupported artifact format {:?} for {}",
                other.unwrap_or(""),
                path.display()
            )))
        }
    };

    let header: ArtifactHeader = serde_json::from_value(document.clone()).map_err(|e| {
        Error::artifact(format!("missing artifact envelope in {}: {e}", path.display()))
    })?;

    if header.kind != expected_kind {
        return Err(Error::artifact(format!(
            "{} holds a '{}' artifact, expected '{expected_kind}'",
            path.display(),
            header.kind
        )));
    }

    if header.format_version != FORMAT_VERSION {
        return Err(Error::artifact(format!(
            "version mismatch in {}: format_version {} is not supported (expected {FORMAT_VERSION})",
            path.display(),
            header.format_version
        )));
    }

    serde_json::from_value(document)
        .map_err(|e| Error::artifact(format!("corrupt artifact {}: {e}", path.display())))
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let paths = ArtifactPaths::default();
        assert_eq!(
            paths.classifier,
            PathBuf::from("Models/Logistic_Regression_model.json")
        );
        assert_eq!(paths.vectorizer, PathBuf::from("Models/tfidf_vectorizer.json"));
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.joblib");
        std::fs::write(&path, "binary blob").unwrap();

        let err = read_artifact::<LogisticArtifact>(&path, CLASSIFIER_KIND).unwrap_err();
        assert!(err.to_string().contains("unsupported artifact format"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(extension(Path::new("a/b.JSON")).as_deref(), Some("json"));
        assert_eq!(extension(Path::new("a/b")), None);
    }
}
