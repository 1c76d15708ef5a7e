//! Deployment configuration for the triage core.
//!
//! Two profiles are in production use and both are first-class here: the
//! default severity-gated profile (severity question asked, tablet path only
//! for short mild complaints) and the duration-gated profile (no severity
//! question, tablet path for any short complaint). Hosts pick a profile at
//! process start; everything downstream reads the chosen values.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which deterministic rule decides the tablet-vs-inference split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriagePolicy {
    /// Tablet path only when severity is mild and the complaint is short.
    SeverityGated,
    /// Tablet path for any short complaint, severity ignored.
    DurationGated,
}

/// Configuration consumed by the dialogue, the triage rule, and the
/// provider lookup. Built once at process start and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    pub policy: TriagePolicy,
    /// A complaint lasting at most this many days counts as short.
    pub duration_threshold_days: u32,
    /// Inclusive lower bound accepted by the duration question.
    pub duration_min_days: u32,
    /// Inclusive upper bound accepted by the duration question.
    pub duration_max_days: u32,
    /// Whether the dialogue asks the severity question at all. The
    /// duration-gated profile skips it and resolves after the duration step.
    pub collect_severity: bool,
    /// Tablet suggestions for known minor symptoms. Keys are exact-match.
    pub symptom_to_tablet: HashMap<String, String>,
    /// Provider on record per specialist category. Keys are exact-match.
    pub specialist_to_provider: HashMap<String, String>,
}

impl TriageConfig {
    /// The reference deployment: severity question asked, tablet path only
    /// for mild complaints of at most two days, duration accepted in 0–30.
    pub fn severity_gated() -> Self {
        Self {
            policy: TriagePolicy::SeverityGated,
            duration_threshold_days: 2,
            duration_min_days: 0,
            duration_max_days: 30,
            collect_severity: true,
            symptom_to_tablet: default_tablet_table(),
            specialist_to_provider: default_provider_table(),
        }
    }

    /// The two-question deployment: no severity step, tablet path for any
    /// complaint of at most two days, duration accepted in 1–60.
    pub fn duration_gated() -> Self {
        Self {
            policy: TriagePolicy::DurationGated,
            duration_threshold_days: 2,
            duration_min_days: 1,
            duration_max_days: 60,
            collect_severity: false,
            symptom_to_tablet: default_tablet_table(),
            specialist_to_provider: default_provider_table(),
        }
    }

    /// Whether a duration answer falls inside the configured inclusive bounds.
    pub fn duration_in_bounds(&self, days: u32) -> bool {
        (self.duration_min_days..=self.duration_max_days).contains(&days)
    }
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self::severity_gated()
    }
}

fn default_tablet_table() -> HashMap<String, String> {
    [
        ("fever", "Paracetamol 500mg – 3 times a day"),
        ("cold", "Cetirizine – 1 tablet at night"),
        ("headache", "Dolo 650mg – 1 tablet"),
        ("body pain", "Ibuprofen 400mg – after food"),
    ]
    .into_iter()
    .map(|(symptom, tablet)| (symptom.to_string(), tablet.to_string()))
    .collect()
}

fn default_provider_table() -> HashMap<String, String> {
    [
        ("Cardiologist", "Dr. Aravind"),
        ("General Physician", "Dr. Kishore"),
        ("Dermatologist", "Dr. Priya"),
        ("Neurologist", "Dr. Manoj"),
        ("Gastroenterologist", "Dr. Suresh"),
        ("ENT Specialist", "Dr. Kavitha"),
    ]
    .into_iter()
    .map(|(specialist, provider)| (specialist.to_string(), provider.to_string()))
    .collect()
}
