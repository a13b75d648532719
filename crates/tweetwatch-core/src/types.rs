//! Core types for tweetwatch

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary output of the disaster classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Label {
    /// Raw label 0
    NonDisaster,
    /// Raw label 1
    Disaster,
}

impl Label {
    /// Map a raw classifier output onto a label.
    ///
    /// Only `0` and `1` are valid; anything else means the classifier artifact
    /// was trained on a different label set.
    pub fn from_raw(raw: i64) -> Result<Self> {
        match raw {
            0 => Ok(Self::NonDisaster),
            1 => Ok(Self::Disaster),
            other => Err(Error::classifier(format!(
                "unexpected label {other}, expected 0 or 1"
            ))),
        }
    }

    /// Raw numeric value of the label
    pub fn as_raw(&self) -> i64 {
        match self {
            Self::NonDisaster => 0,
            Self::Disaster => 1,
        }
    }

    /// Human-readable sentence rendered back to the user
    pub fn message(&self) -> &'static str {
        match self {
            Self::Disaster => "This tweet indicates a disaster.",
            Self::NonDisaster => "This tweet does not indicate a disaster.",
        }
    }

    /// Stable lowercase name (used for metrics and logging)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disaster => "disaster",
            Self::NonDisaster => "non_disaster",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse numeric feature representation of a piece of text
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dim: usize,
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// An all-zero vector of the given dimensionality
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            indices: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Build a vector from `(index, value)` entries.
    ///
    /// Entries are sorted by index, duplicate indices are summed and zero
    /// values are dropped. Indices must be below `dim`.
    pub fn from_entries(dim: usize, entries: impl IntoIterator<Item = (usize, f64)>) -> Result<Self> {
        let mut entries: Vec<(usize, f64)> = entries.into_iter().collect();
        entries.sort_by_key(|(idx, _)| *idx);

        let mut indices = Vec::with_capacity(entries.len());
        let mut values: Vec<f64> = Vec::with_capacity(entries.len());

        for (idx, value) in entries {
            if idx >= dim {
                return Err(Error::vectorizer(format!(
                    "feature index {idx} out of bounds for dimension {dim}"
                )));
            }
            if indices.last() == Some(&idx) {
                if let Some(last) = values.last_mut() {
                    *last += value;
                }
            } else {
                indices.push(idx);
                values.push(value);
            }
        }

        let mut vector = Self { dim, indices, values };
        vector.prune_zeros();
        Ok(vector)
    }

    fn prune_zeros(&mut self) {
        let mut keep_idx = Vec::with_capacity(self.indices.len());
        let mut keep_val = Vec::with_capacity(self.values.len());
        for (&idx, &value) in self.indices.iter().zip(&self.values) {
            if value != 0.0 {
                keep_idx.push(idx);
                keep_val.push(value);
            }
        }
        self.indices = keep_idx;
        self.values = keep_val;
    }

    /// Dimensionality of the feature space
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    /// Whether every entry is zero
    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterate over `(index, value)` pairs in increasing index order
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    /// Value at `index` (zero when absent)
    pub fn get(&self, index: usize) -> f64 {
        match self.indices.binary_search(&index) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    /// Dot product with a dense weight vector of the same dimensionality
    pub fn dot(&self, weights: &[f64]) -> Result<f64> {
        if weights.len() != self.dim {
            return Err(Error::classifier(format!(
                "dimension mismatch: features have {} columns, weights have {}",
                self.dim,
                weights.len()
            )));
        }
        Ok(self.iter().map(|(idx, value)| weights[idx] * value).sum())
    }

    /// Multiply every entry by `factor`
    pub fn scale(&mut self, factor: f64) {
        for value in &mut self.values {
            *value *= factor;
        }
    }

    /// Euclidean norm
    pub fn l2_norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Sum of absolute values
    pub fn l1_norm(&self) -> f64 {
        self.values.iter().map(|v| v.abs()).sum()
    }
}

/// Successful outcome of one prediction request
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Predicted label
    pub label: Label,

    /// Message rendered for the label
    pub message: String,

    /// The submitted text
    pub text: String,

    /// Probability of the disaster class (0.0-1.0)
    pub probability: f64,

    /// Vectorize + classify latency in microseconds
    pub latency_us: u64,
}
