//! Tweetwatch Core
//!
//! Core types and error handling shared across tweetwatch components.
//!
//! This crate provides:
//! - The `Error` type and `Result` alias
//! - The binary `Label` and its user-facing messages
//! - The sparse `FeatureVector` passed from vectorizer to classifier
//! - The `Prediction` returned for rendering

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{FeatureVector, Label, Prediction};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{FeatureVector, Label, Prediction};
}
