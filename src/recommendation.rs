//! Terminal artifacts of a resolved dialogue.
//!
//! A dialogue ends in exactly one of two shapes: a tablet suggestion for
//! apparently minor complaints, or a disease/specialist recommendation
//! produced by the inference pipeline. Both are immutable once built and
//! serialize cleanly so hosts can ship them over any boundary.

use serde::{Deserialize, Serialize};

/// Fallback advisory used when a minor complaint has no tablet entry.
pub const GENERIC_ADVICE: &str =
    "This looks like a minor complaint. Rest, stay hydrated, and use basic over-the-counter medicine if needed.";

/// Advisory surfaced when a specialist was identified but no provider is
/// on record for that specialty.
pub const NO_PROVIDER_ADVISORY: &str =
    "A specialist category was identified, but no provider is on record for it.";

/// Tablet suggestion for a minor complaint, resolved by the triage rule
/// without consulting the models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationAdvice {
    pub symptom: String,
    /// Configured dosage text, or [`GENERIC_ADVICE`] when the symptom has
    /// no tablet entry.
    pub suggested_tablet: String,
}

/// Disease and specialist prediction produced by the inference pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalRecommendation {
    pub predicted_disease: String,
    pub predicted_specialist: String,
    /// Present only when the specialist label is a known provider-table key.
    pub provider_name: Option<String>,
}

impl ClinicalRecommendation {
    /// The "no provider mapping" advisory, exactly when no provider was found.
    pub fn provider_advisory(&self) -> Option<&'static str> {
        match self.provider_name {
            Some(_) => None,
            None => Some(NO_PROVIDER_ADVISORY),
        }
    }
}

/// Outcome of a resolved dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    Medication(MedicationAdvice),
    Clinical(ClinicalRecommendation),
}
