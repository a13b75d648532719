//! TF-IDF vectorizer
//!
//! Replays a vectorizer fitted by the external training run: the vocabulary and
//! IDF weights come from the artifact, this module only applies them.

use crate::vectorizer::Vectorizer;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tweetwatch_core::{Error, FeatureVector, Result};

/// Default token pattern: words of two or more characters
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Default upper bound on accepted input size in bytes
pub const DEFAULT_MAX_INPUT_BYTES: usize = 10_000;

/// Normalization applied to each output vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// Serialized form of a fitted TF-IDF vectorizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfArtifact {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,

    /// IDF weight per column
    pub idf: Vec<f64>,

    #[serde(default = "default_true")]
    pub lowercase: bool,

    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,

    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),

    #[serde(default)]
    pub stop_words: Vec<String>,

    #[serde(default)]
    pub sublinear_tf: bool,

    #[serde(default)]
    pub norm: Norm,

    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
}

fn default_true() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

impl TfidfArtifact {
    /// Artifact with default settings for the given vocabulary and weights
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f64>) -> Self {
        Self {
            vocabulary,
            idf,
            lowercase: true,
            token_pattern: default_token_pattern(),
            ngram_range: default_ngram_range(),
            stop_words: Vec::new(),
            sublinear_tf: false,
            norm: Norm::L2,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// A fitted, immutable TF-IDF vectorizer
#[derive(Debug)]
pub struct TfidfVectorizer {
    name: String,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    token_pattern: Regex,
    lowercase: bool,
    ngram_range: (usize, usize),
    stop_words: HashSet<String>,
    sublinear_tf: bool,
    norm: Norm,
    max_input_bytes: usize,
}

impl TfidfVectorizer {
    /// Build a vectorizer from its artifact, validating internal consistency
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self> {
        let dim = artifact.idf.len();
        if dim == 0 {
            return Err(Error::artifact("vectorizer has an empty idf table"));
        }

        if let Some((term, idx)) = artifact.vocabulary.iter().find(|(_, idx)| **idx >= dim) {
            return Err(Error::artifact(format!(
                "vocabulary term '{term}' maps to column {idx}, but idf has {dim} columns"
            )));
        }

        if artifact.idf.iter().any(|w| !w.is_finite()) {
            return Err(Error::artifact("vectorizer idf contains non-finite weights"));
        }

        let (min_n, max_n) = artifact.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(Error::artifact(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        let token_pattern = Regex::new(&artifact.token_pattern).map_err(|e| {
            Error::artifact(format!(
                "invalid token pattern '{}': {e}",
                artifact.token_pattern
            ))
        })?;

        let stop_words = artifact
            .stop_words
            .into_iter()
            .map(|w| if artifact.lowercase { w.to_lowercase() } else { w })
            .collect();

        Ok(Self {
            name: "tfidf".to_string(),
            vocabulary: artifact.vocabulary,
            idf: artifact.idf,
            token_pattern,
            lowercase: artifact.lowercase,
            ngram_range: artifact.ngram_range,
            stop_words,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
            max_input_bytes: artifact.max_input_bytes,
        })
    }

    /// Number of terms in the vocabulary
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Split a document into the terms looked up in the vocabulary
    pub fn analyze(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let tokens: Vec<&str> = self
            .token_pattern
            .find_iter(&text)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(*t))
            .collect();

        let (min_n, max_n) = self.ngram_range;
        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    fn vectorize(&self, text: &str) -> Result<FeatureVector> {
        if text.len() > self.max_input_bytes {
            return Err(Error::vectorizer(format!(
                "input of {} bytes exceeds the {} byte limit",
                text.len(),
                self.max_input_bytes
            )));
        }

        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let entries = counts.into_iter().map(|(idx, count)| {
            let tf = if self.sublinear_tf {
                1.0 + count.ln()
            } else {
                count
            };
            (idx, tf * self.idf[idx])
        });

        let mut vector = FeatureVector::from_entries(self.idf.len(), entries)?;

        let norm = match self.norm {
            Norm::L2 => vector.l2_norm(),
            Norm::L1 => vector.l1_norm(),
            Norm::None => 1.0,
        };
        if norm > 0.0 {
            vector.scale(1.0 / norm);
        }

        Ok(vector)
    }
}

#[async_trait::async_trait]
impl Vectorizer for TfidfVectorizer {
    async fn transform(&self, text: &str) -> Result<FeatureVector> {
        self.vectorize(text)
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
