//! Recommendation engine: the triage rule in front of the inference pipeline.
//!
//! Built once at process start from a configuration profile and the loaded
//! model artifacts, then shared read-only across every session.

use crate::config::TriageConfig;
use crate::inference::{orchestrator, InferenceError, ModelArtifacts};
use crate::recommendation::Recommendation;
use crate::session::Severity;
use crate::triage;

pub struct TriageEngine {
    config: TriageConfig,
    models: ModelArtifacts,
}

impl TriageEngine {
    pub fn new(config: TriageConfig, models: ModelArtifacts) -> Self {
        Self { config, models }
    }

    pub fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Decide one resolved dialogue: triage first, inference on deferral.
    pub fn recommend(
        &self,
        symptom: &str,
        duration_days: u32,
        severity: Option<Severity>,
    ) -> Result<Recommendation, InferenceError> {
        if let Some(advice) = triage::evaluate(symptom, duration_days, severity, &self.config) {
            tracing::info!(
                symptom = symptom,
                duration_days = duration_days,
                "triage rule resolved the case without inference"
            );
            return Ok(Recommendation::Medication(advice));
        }

        let clinical =
            orchestrator::infer(symptom, &self.models, &self.config.specialist_to_provider)?;
        Ok(Recommendation::Clinical(clinical))
    }
}
