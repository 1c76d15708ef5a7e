//! ONNX Runtime adapters for real model artifacts — behind `onnx-models`.
//!
//! The vectorizer expects two files in its model directory:
//! - `model.onnx` — a sentence-embedding model (e.g. all-MiniLM-L6-v2)
//! - `tokenizer.json` — HuggingFace tokenizer definition
//!
//! The classifier expects a single `.onnx` file taking a `[1, dim]` float
//! input and producing a `[1, n_classes]` score tensor; the predicted class
//! is the argmax. Both wrap their runtime session in a `Mutex` because
//! `ort::Session::run` requires `&mut self` while the traits expose `&self`
//! for shared usage.

use std::path::Path;
use std::sync::Mutex;

use ort::session::Session;

use super::{Classifier, FeatureVector, InferenceError, Vectorizer};

// ───────────────────────────────────────────────────────────
// Vectorizer
// ───────────────────────────────────────────────────────────

/// Sentence-embedding vectorizer: tokenize, run the encoder, mean-pool with
/// the attention mask, L2-normalize.
pub struct OnnxVectorizer {
    session: Mutex<Session>,
    tokenizer: tokenizers::Tokenizer,
    dimension: usize,
}

impl OnnxVectorizer {
    /// Load from a directory containing `model.onnx` and `tokenizer.json`.
    pub fn load(model_dir: &Path, dimension: usize) -> Result<Self, InferenceError> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            return Err(InferenceError::ModelNotFound(model_path));
        }
        if !tokenizer_path.exists() {
            return Err(InferenceError::ModelNotFound(tokenizer_path));
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| InferenceError::ModelInit(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e: ort::Error| InferenceError::ModelInit(e.to_string()))?
            .commit_from_file(&model_path)
            .map_err(|e: ort::Error| InferenceError::ModelInit(format!("ONNX load failed: {e}")))?;

        let tokenizer = tokenizers::Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| InferenceError::ModelInit(format!("Tokenizer load failed: {e}")))?;

        tracing::info!("ONNX vectorizer loaded from {}", model_dir.display());

        Ok(Self {
            session: Mutex::new(session),
            tokenizer,
            dimension,
        })
    }

    fn embed(&self, text: &str) -> Result<FeatureVector, InferenceError> {
        use ort::value::TensorRef;

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| InferenceError::Tokenization(e.to_string()))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();
        let token_type_ids: Vec<i64> = encoding
            .get_type_ids()
            .iter()
            .map(|&t| t as i64)
            .collect();

        let seq_len = input_ids.len();

        let ids_array = ndarray::Array2::from_shape_vec((1, seq_len), input_ids)
            .map_err(|e| InferenceError::Vectorization(e.to_string()))?;
        let mask_array = ndarray::Array2::from_shape_vec((1, seq_len), attention_mask.clone())
            .map_err(|e| InferenceError::Vectorization(e.to_string()))?;
        let type_array = ndarray::Array2::from_shape_vec((1, seq_len), token_type_ids)
            .map_err(|e| InferenceError::Vectorization(e.to_string()))?;

        let ids_tensor = TensorRef::from_array_view(&ids_array)
            .map_err(|e| InferenceError::Vectorization(e.to_string()))?;
        let mask_tensor = TensorRef::from_array_view(&mask_array)
            .map_err(|e| InferenceError::Vectorization(e.to_string()))?;
        let type_tensor = TensorRef::from_array_view(&type_array)
            .map_err(|e| InferenceError::Vectorization(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Vectorization("Session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![ids_tensor, mask_tensor, type_tensor])
            .map_err(|e| InferenceError::Vectorization(format!("ONNX inference failed: {e}")))?;

        // Output shape: [1, seq_len, dim] — mean pooling with attention mask
        let (shape, output_data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Vectorization(format!("Output extraction: {e}")))?;

        if shape.len() != 3 || shape[2] as usize != self.dimension {
            return Err(InferenceError::Vectorization(format!(
                "Unexpected output shape: {shape:?}, expected [1, {seq_len}, {}]",
                self.dimension
            )));
        }

        let mut pooled = vec![0.0f32; self.dimension];
        let mut mask_sum = 0.0f32;

        for (token_idx, &mask_val_i64) in attention_mask.iter().enumerate().take(seq_len) {
            let mask_val = mask_val_i64 as f32;
            mask_sum += mask_val;
            let offset = token_idx * self.dimension;
            for (dim_idx, p) in pooled.iter_mut().enumerate() {
                *p += output_data[offset + dim_idx] * mask_val;
            }
        }

        if mask_sum > 0.0 {
            for val in &mut pooled {
                *val /= mask_sum;
            }
        }

        // L2 normalize
        let norm: f32 = pooled.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for val in &mut pooled {
                *val /= norm;
            }
        }

        Ok(pooled)
    }
}

impl Vectorizer for OnnxVectorizer {
    fn transform(&self, texts: &[&str]) -> Result<Vec<FeatureVector>, InferenceError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

// ───────────────────────────────────────────────────────────
// Classifier
// ───────────────────────────────────────────────────────────

/// Score-tensor classifier: one `[1, dim]` float input, argmax over the
/// `[1, n_classes]` output.
pub struct OnnxClassifier {
    session: Mutex<Session>,
}

impl OnnxClassifier {
    pub fn load(model_path: &Path) -> Result<Self, InferenceError> {
        if !model_path.exists() {
            return Err(InferenceError::ModelNotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| InferenceError::ModelInit(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e: ort::Error| InferenceError::ModelInit(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e: ort::Error| InferenceError::ModelInit(format!("ONNX load failed: {e}")))?;

        tracing::info!("ONNX classifier loaded from {}", model_path.display());

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    fn predict_one(&self, vector: &[f32]) -> Result<usize, InferenceError> {
        use ort::value::TensorRef;

        let input_array = ndarray::Array2::from_shape_vec((1, vector.len()), vector.to_vec())
            .map_err(|e| InferenceError::Prediction(e.to_string()))?;
        let input_tensor = TensorRef::from_array_view(&input_array)
            .map_err(|e| InferenceError::Prediction(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| InferenceError::Prediction("Session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError::Prediction(format!("ONNX inference failed: {e}")))?;

        let (shape, scores) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError::Prediction(format!("Output extraction: {e}")))?;

        if shape.len() != 2 || shape[0] != 1 {
            return Err(InferenceError::Prediction(format!(
                "Unexpected output shape: {shape:?}, expected [1, n_classes]"
            )));
        }

        scores
            .iter()
            .copied()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
            .ok_or_else(|| InferenceError::Prediction("empty score tensor".to_string()))
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, vectors: &[FeatureVector]) -> Result<Vec<usize>, InferenceError> {
        vectors.iter().map(|v| self.predict_one(v)).collect()
    }
}
