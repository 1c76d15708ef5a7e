//! The inference sequence behind a clinical recommendation.
//!
//! Vectorize the symptom as a single-element batch, run both classifiers on
//! the same feature vector, decode each prediction with its own encoder,
//! then look up the provider on record for the predicted specialist. Any
//! failure propagates as-is: no retry, no fallback prediction.

use std::collections::HashMap;

use crate::recommendation::ClinicalRecommendation;

use super::{InferenceError, ModelArtifacts};

/// Run the full pipeline for one symptom text.
///
/// A specialist without a provider-table entry is not an error; the
/// recommendation surfaces with `provider_name: None` and the caller shows
/// the no-provider advisory.
pub fn infer(
    symptom: &str,
    models: &ModelArtifacts,
    specialist_to_provider: &HashMap<String, String>,
) -> Result<ClinicalRecommendation, InferenceError> {
    let vectors = models.vectorizer.transform(&[symptom])?;
    let vector = single(vectors, "vectorizer")?;
    let input = std::slice::from_ref(&vector);

    let disease_index = single(models.disease_model.predict(input)?, "disease model")?;
    let specialist_index = single(models.specialist_model.predict(input)?, "specialist model")?;

    let predicted_disease = single(
        models.disease_encoder.inverse_transform(&[disease_index])?,
        "disease encoder",
    )?;
    let predicted_specialist = single(
        models
            .specialist_encoder
            .inverse_transform(&[specialist_index])?,
        "specialist encoder",
    )?;

    let provider_name = specialist_to_provider.get(&predicted_specialist).cloned();

    if provider_name.is_none() {
        tracing::warn!(
            specialist = %predicted_specialist,
            "no provider on record for predicted specialist"
        );
    }

    tracing::info!(
        disease = %predicted_disease,
        specialist = %predicted_specialist,
        provider_found = provider_name.is_some(),
        "inference complete"
    );

    Ok(ClinicalRecommendation {
        predicted_disease,
        predicted_specialist,
        provider_name,
    })
}

/// Unwrap a single-element batch, enforcing the position-alignment contract.
fn single<T>(mut batch: Vec<T>, stage: &'static str) -> Result<T, InferenceError> {
    if batch.len() != 1 {
        return Err(InferenceError::Misaligned {
            stage,
            expected: 1,
            actual: batch.len(),
        });
    }
    Ok(batch.remove(0))
}
