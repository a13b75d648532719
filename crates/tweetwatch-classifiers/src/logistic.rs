//! Logistic regression classifier

use crate::classifier::{BinaryClassifier, ClassificationMetadata, ClassificationResult};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tweetwatch_core::{Error, FeatureVector, Label, Result};

/// Serialized form of a trained logistic regression model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticArtifact {
    /// One weight per feature column
    pub coef: Vec<f64>,

    pub intercept: f64,

    /// Raw labels for the negative and positive side of the decision boundary
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

/// A trained, immutable binary logistic regression model
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    name: String,
    coef: Vec<f64>,
    intercept: f64,
    classes: [i64; 2],
}

impl LogisticRegression {
    /// Build a model from its artifact
    ///
    /// The feature dimensionality is not checked here; a vectorizer that
    /// disagrees with `coef` surfaces as a classification error.
    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self> {
        if artifact.coef.is_empty() {
            return Err(Error::artifact("classifier has no coefficients"));
        }

        if !artifact.intercept.is_finite() || artifact.coef.iter().any(|w| !w.is_finite()) {
            return Err(Error::artifact("classifier contains non-finite weights"));
        }

        let classes: [i64; 2] = match artifact.classes.as_slice() {
            [neg, pos] if neg != pos => [*neg, *pos],
            other => {
                return Err(Error::artifact(format!(
                    "classifier must have exactly two distinct classes, got {other:?}"
                )))
            }
        };
        for raw in classes {
            Label::from_raw(raw).map_err(|_| {
                Error::artifact(format!("classifier class {raw} is not a binary label"))
            })?;
        }

        Ok(Self {
            name: "logistic_regression".to_string(),
            coef: artifact.coef,
            intercept: artifact.intercept,
            classes,
        })
    }

    /// Number of feature columns the model was trained on
    pub fn dimension(&self) -> usize {
        self.coef.len()
    }

    /// Signed distance to the decision boundary
    pub fn decision_function(&self, features: &FeatureVector) -> Result<f64> {
        Ok(features.dot(&self.coef)? + self.intercept)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[async_trait::async_trait]
impl BinaryClassifier for LogisticRegression {
    async fn classify(&self, features: &FeatureVector) -> Result<ClassificationResult> {
        let start = Instant::now();

        let z = self.decision_function(features)?;
        let positive = sigmoid(z);
        let raw = if z > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        };
        let label = Label::from_raw(raw)?;

        // probability reported for the disaster class regardless of class order
        let score = if self.classes[1] == Label::Disaster.as_raw() {
            positive
        } else {
            1.0 - positive
        };

        Ok(ClassificationResult {
            label,
            score,
            metadata: ClassificationMetadata {
                model: Some(self.name.clone()),
                decision: Some(z),
                ..Default::default()
            },
            latency_us: start.elapsed().as_micros() as u64,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(coef: Vec<f64>, intercept: f64) -> LogisticRegression {
        LogisticRegression::from_artifact(LogisticArtifact {
            coef,
            intercept,
            classes: default_classes(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_positive_decision_is_disaster() {
        let m = model(vec![3.0, -2.0], -0.5);
        let x = FeatureVector::from_entries(2, vec![(0, 1.0)]).unwrap();

        let result = m.classify(&x).await.unwrap();
        assert_eq!(result.label, Label::Disaster);
        assert!(result.score > 0.5);
        assert_eq!(result.metadata.decision, Some(2.5));
    }

    #[tokio::test]
    async fn test_negative_decision_is_non_disaster() {
        let m = model(vec![3.0, -2.0], -0.5);
        let x = FeatureVector::from_entries(2, vec![(1, 1.0)]).unwrap();

        let result = m.classify(&x).await.unwrap();
        assert_eq!(result.label, Label::NonDisaster);
        assert!(result.score < 0.5);
    }

    #[tokio::test]
    async fn test_zero_decision_falls_to_first_class() {
        let m = model(vec![1.0], 0.0);
        let result = m.classify(&FeatureVector::zeros(1)).await.unwrap();
        assert_eq!(result.label, Label::NonDisaster);
        assert_eq!(result.score, 0.5);
    }

    #[tokio::test]
    async fn test_reversed_classes() {
        let m = LogisticRegression::from_artifact(LogisticArtifact {
            coef: vec![1.0],
            intercept: 0.0,
            classes: vec![1, 0],
        })
        .unwrap();
        let x = FeatureVector::from_entries(1, vec![(0, 4.0)]).unwrap();

        let result = m.classify(&x).await.unwrap();
        assert_eq!(result.label, Label::NonDisaster);
        assert!(result.score < 0.5);
    }

    #[tokio::test]
    async fn test_dimension_mismatch_fails_at_classification() {
        let m = model(vec![1.0, 1.0, 1.0], 0.0);
        let x = FeatureVector::from_entries(2, vec![(0, 1.0)]).unwrap();

        let err = m.classify(&x).await.unwrap_err();
        assert!(matches!(err, Error::Classifier(_)));
    }

    #[test]
    fn test_artifact_validation() {
        let bad = |coef: Vec<f64>, classes: Vec<i64>| {
            LogisticRegression::from_artifact(LogisticArtifact {
                coef,
                intercept: 0.0,
                classes,
            })
        };

        assert!(bad(vec![], vec![0, 1]).is_err());
        assert!(bad(vec![f64::NAN], vec![0, 1]).is_err());
        assert!(bad(vec![1.0], vec![0]).is_err());
        assert!(bad(vec![1.0], vec![1, 1]).is_err());
        assert!(bad(vec![1.0], vec![0, 2]).is_err());
        assert_eq!(bad(vec![1.0, 2.0], vec![0, 1]).unwrap().dimension(), 2);
    }
}
