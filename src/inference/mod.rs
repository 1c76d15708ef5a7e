//! Interfaces to the pre-trained model artifacts.
//!
//! The core treats the vectorizer, the two classifiers, and the two label
//! encoders as opaque components behind the three traits below. All of them
//! are loaded by the host at process start, never mutated afterwards, and
//! shared read-only across sessions. Any implementation of the traits
//! works: the stock [`mock`] module is enough for tests, and the
//! `onnx-models` feature ships ONNX Runtime adapters for real artifacts.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

pub mod encoder;
pub mod mock;
pub mod orchestrator;

#[cfg(feature = "onnx-models")]
pub mod onnx;

pub use encoder::StaticLabelEncoder;
pub use mock::{MockClassifier, MockVectorizer};
pub use orchestrator::infer;

#[cfg(feature = "onnx-models")]
pub use onnx::{OnnxClassifier, OnnxVectorizer};

/// Fixed-dimension numeric feature representation of a symptom text.
pub type FeatureVector = Vec<f32>;

/// Maps free text to feature vectors, position-aligned with the input.
/// Must accept a single-element batch.
pub trait Vectorizer: Send + Sync {
    fn transform(&self, texts: &[&str]) -> Result<Vec<FeatureVector>, InferenceError>;
}

/// Maps feature vectors to predicted class indices, position-aligned with
/// the input.
pub trait Classifier: Send + Sync {
    fn predict(&self, vectors: &[FeatureVector]) -> Result<Vec<usize>, InferenceError>;
}

/// Decodes class indices back to human-readable labels, position-aligned
/// with the input. Fails on an index outside the known class set.
pub trait LabelEncoder: Send + Sync {
    fn inverse_transform(&self, indices: &[usize]) -> Result<Vec<String>, InferenceError>;
}

/// The full set of loaded artifacts the inference pipeline consults.
/// Handles are shared so concurrent sessions read the same models.
#[derive(Clone)]
pub struct ModelArtifacts {
    pub vectorizer: Arc<dyn Vectorizer>,
    pub disease_model: Arc<dyn Classifier>,
    pub specialist_model: Arc<dyn Classifier>,
    pub disease_encoder: Arc<dyn LabelEncoder>,
    pub specialist_encoder: Arc<dyn LabelEncoder>,
}

impl ModelArtifacts {
    pub fn new(
        vectorizer: Arc<dyn Vectorizer>,
        disease_model: Arc<dyn Classifier>,
        specialist_model: Arc<dyn Classifier>,
        disease_encoder: Arc<dyn LabelEncoder>,
        specialist_encoder: Arc<dyn LabelEncoder>,
    ) -> Self {
        Self {
            vectorizer,
            disease_model,
            specialist_model,
            disease_encoder,
            specialist_encoder,
        }
    }
}

/// Failure inside vectorization, classification, or label decoding.
/// Not locally recoverable: the current recommendation request fails and
/// the dialogue stays resolved so the caller may retry or reset.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("vectorization failed: {0}")]
    Vectorization(String),

    #[error("classification failed: {0}")]
    Prediction(String),

    #[error("class index {index} is outside the encoder's known set of {known} classes")]
    UnknownClassIndex { index: usize, known: usize },

    #[error("{stage} returned {actual} results for {expected} inputs")]
    Misaligned {
        stage: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("model artifact not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("model initialization failed: {0}")]
    ModelInit(String),

    #[error("tokenization failed: {0}")]
    Tokenization(String),
}
