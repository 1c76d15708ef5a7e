//! Deterministic mock models for tests and development hosts.

use super::{Classifier, FeatureVector, InferenceError, Vectorizer};

/// Default dimension of mock feature vectors.
pub const MOCK_DIM: usize = 64;

/// Mock vectorizer — produces deterministic L2-normalized vectors.
pub struct MockVectorizer {
    dimension: usize,
}

impl MockVectorizer {
    pub fn new() -> Self {
        Self { dimension: MOCK_DIM }
    }

    pub fn with_dimension(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for MockVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Vectorizer for MockVectorizer {
    fn transform(&self, texts: &[&str]) -> Result<Vec<FeatureVector>, InferenceError> {
        Ok(texts
            .iter()
            .map(|t| deterministic_vector(t, self.dimension))
            .collect())
    }
}

/// Mock classifier — returns a fixed class index for every input vector.
pub struct MockClassifier {
    class_index: usize,
}

impl MockClassifier {
    pub fn returning(class_index: usize) -> Self {
        Self { class_index }
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, vectors: &[FeatureVector]) -> Result<Vec<usize>, InferenceError> {
        Ok(vec![self.class_index; vectors.len()])
    }
}

/// Generate a deterministic unit vector from text.
/// Simple byte-based construction so equal texts always map to equal vectors.
fn deterministic_vector(text: &str, dim: usize) -> FeatureVector {
    let mut vec = vec![0.0f32; dim];
    let bytes = text.as_bytes();

    for (i, slot) in vec.iter_mut().enumerate() {
        let byte_idx = i % bytes.len().max(1);
        *slot = (bytes.get(byte_idx).copied().unwrap_or(0) as f32 + i as f32) / 255.0;
    }

    // L2 normalize
    let norm: f32 = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for val in &mut vec {
            *val /= norm;
        }
    }

    vec
}
