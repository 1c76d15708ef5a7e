//! Deterministic triage: decides whether ML inference is needed at all.
//!
//! A pure function of the three collected answers and the configuration.
//! When the gate fires the case resolves to a tablet suggestion and the
//! models are never consulted; otherwise the rule defers and the caller
//! runs the inference pipeline.

use crate::config::{TriageConfig, TriagePolicy};
use crate::recommendation::{MedicationAdvice, GENERIC_ADVICE};
use crate::session::Severity;

/// Evaluate the triage rule for one resolved dialogue.
///
/// Returns `Some` tablet advice when the configured gate fires, `None` to
/// defer to inference. Under the severity-gated policy a dialogue that never
/// collected severity always defers.
pub fn evaluate(
    symptom: &str,
    duration_days: u32,
    severity: Option<Severity>,
    config: &TriageConfig,
) -> Option<MedicationAdvice> {
    if !gate_fires(duration_days, severity, config) {
        return None;
    }

    // Exact-match lookup; a miss still resolves the case with the generic
    // rest-and-hydration advisory.
    let suggested_tablet = config
        .symptom_to_tablet
        .get(symptom)
        .cloned()
        .unwrap_or_else(|| GENERIC_ADVICE.to_string());

    tracing::debug!(
        symptom = symptom,
        duration_days = duration_days,
        policy = ?config.policy,
        "triage gate fired"
    );

    Some(MedicationAdvice {
        symptom: symptom.to_string(),
        suggested_tablet,
    })
}

fn gate_fires(duration_days: u32, severity: Option<Severity>, config: &TriageConfig) -> bool {
    let short = duration_days <= config.duration_threshold_days;
    match config.policy {
        TriagePolicy::SeverityGated => severity == Some(Severity::Mild) && short,
        TriagePolicy::DurationGated => short,
    }
}
