//! Guided intake dialogue: symptom, duration, severity, result.
//!
//! A `Session` is owned by exactly one interactive caller; the presentation
//! layer creates one per user, feeds it one answer per step, and reads the
//! recommendation once the dialogue resolves. All decision machinery lives
//! behind the shared [`TriageEngine`] handle, so concurrent dialogues are
//! just independent sessions over the same read-only engine.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::engine::TriageEngine;
use crate::inference::InferenceError;
use crate::recommendation::Recommendation;

// ───────────────────────────────────────────────────────────
// Steps and severity levels
// ───────────────────────────────────────────────────────────

/// Where the dialogue currently is. Steps advance strictly forward; the only
/// backward transition is an explicit restart from `Resolved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueStep {
    AwaitingSymptom,
    AwaitingDuration,
    AwaitingSeverity,
    Resolved,
}

impl DialogueStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AwaitingSymptom => "awaiting_symptom",
            Self::AwaitingDuration => "awaiting_duration",
            Self::AwaitingSeverity => "awaiting_severity",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for DialogueStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reported severity of the complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    /// Lenient on case and surrounding whitespace; anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mild" => Ok(Self::Mild),
            "moderate" => Ok(Self::Moderate),
            "severe" => Ok(Self::Severe),
            _ => Err(ValidationError::UnknownSeverity(s.trim().to_string())),
        }
    }
}

// ───────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────

/// A user answer violated a field constraint. The caller re-prompts; the
/// dialogue state is unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symptom description is empty")]
    EmptySymptom,

    #[error("duration of {value} days is outside the accepted range of {min}-{max} days")]
    DurationOutOfRange { value: u32, min: u32, max: u32 },

    #[error("unrecognized severity level: {0:?}")]
    UnknownSeverity(String),
}

/// An operation was invoked in the wrong dialogue step. A caller bug; the
/// dialogue state is unchanged.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("operation requires the {expected} step, but the dialogue is at {actual}")]
pub struct InvalidStateError {
    pub expected: DialogueStep,
    pub actual: DialogueStep,
}

/// Error type of every session operation.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

// ───────────────────────────────────────────────────────────
// Session
// ───────────────────────────────────────────────────────────

/// One user's dialogue. Fields for not-yet-reached steps stay unset;
/// reaching `Resolved` guarantees symptom and duration are present, and
/// severity too when the profile collects it.
pub struct Session {
    id: Uuid,
    started_at: NaiveDateTime,
    engine: Arc<TriageEngine>,
    step: DialogueStep,
    symptom: Option<String>,
    duration_days: Option<u32>,
    severity: Option<Severity>,
}

impl Session {
    pub fn new(engine: Arc<TriageEngine>) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Local::now().naive_local(),
            engine,
            step: DialogueStep::AwaitingSymptom,
            symptom: None,
            duration_days: None,
            severity: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    pub fn step(&self) -> DialogueStep {
        self.step
    }

    pub fn symptom(&self) -> Option<&str> {
        self.symptom.as_deref()
    }

    pub fn duration_days(&self) -> Option<u32> {
        self.duration_days
    }

    pub fn severity(&self) -> Option<Severity> {
        self.severity
    }

    fn require_step(&self, expected: DialogueStep) -> Result<(), InvalidStateError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(InvalidStateError {
                expected,
                actual: self.step,
            })
        }
    }

    /// Record the main symptom. Valid only while awaiting the symptom.
    pub fn submit_symptom(&mut self, text: &str) -> Result<(), SessionError> {
        self.require_step(DialogueStep::AwaitingSymptom)?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymptom.into());
        }

        self.symptom = Some(trimmed.to_string());
        self.step = DialogueStep::AwaitingDuration;
        tracing::debug!(session_id = %self.id, step = %self.step, "symptom recorded");
        Ok(())
    }

    /// Record how many days the complaint has lasted. Valid only while
    /// awaiting the duration; bounds come from the configured profile.
    pub fn submit_duration(&mut self, days: u32) -> Result<(), SessionError> {
        self.require_step(DialogueStep::AwaitingDuration)?;

        let config = self.engine.config();
        if !config.duration_in_bounds(days) {
            return Err(ValidationError::DurationOutOfRange {
                value: days,
                min: config.duration_min_days,
                max: config.duration_max_days,
            }
            .into());
        }

        self.duration_days = Some(days);
        self.step = if config.collect_severity {
            DialogueStep::AwaitingSeverity
        } else {
            DialogueStep::Resolved
        };
        tracing::debug!(session_id = %self.id, step = %self.step, "duration recorded");
        Ok(())
    }

    /// Record the reported severity. Valid only while awaiting severity;
    /// profiles that skip the severity question never reach this step.
    pub fn submit_severity(&mut self, level: Severity) -> Result<(), SessionError> {
        self.require_step(DialogueStep::AwaitingSeverity)?;

        self.severity = Some(level);
        self.step = DialogueStep::Resolved;
        tracing::debug!(session_id = %self.id, step = %self.step, "severity recorded");
        Ok(())
    }

    /// Produce the recommendation for the resolved dialogue.
    ///
    /// Idempotent and uncached: every call re-runs the triage rule and, on
    /// deferral, the inference pipeline. An inference failure leaves the
    /// dialogue resolved so the caller may retry or reset.
    pub fn recommendation(&self) -> Result<Recommendation, SessionError> {
        self.require_step(DialogueStep::Resolved)?;

        let (symptom, duration_days) = match (self.symptom.as_deref(), self.duration_days) {
            (Some(symptom), Some(duration_days)) => (symptom, duration_days),
            // Transitions only reach Resolved with both fields set.
            _ => {
                return Err(InvalidStateError {
                    expected: DialogueStep::Resolved,
                    actual: self.step,
                }
                .into())
            }
        };

        Ok(self.engine.recommend(symptom, duration_days, self.severity)?)
    }

    /// Restart the dialogue. Valid only from `Resolved`; clears every
    /// collected answer and hands back a fresh identity.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        self.require_step(DialogueStep::Resolved)?;

        self.id = Uuid::new_v4();
        self.started_at = Local::now().naive_local();
        self.symptom = None;
        self.duration_days = None;
        self.severity = None;
        self.step = DialogueStep::AwaitingSymptom;
        tracing::debug!(session_id = %self.id, "dialogue restarted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::config::TriageConfig;
    use crate::inference::{
        FeatureVector, MockClassifier, ModelArtifacts, StaticLabelEncoder, Vectorizer,
    };
    use crate::recommendation::GENERIC_ADVICE;

    use super::*;

    /// Vectorizer double that counts invocations.
    struct CountingVectorizer {
        calls: AtomicUsize,
    }

    impl CountingVectorizer {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Vectorizer for CountingVectorizer {
        fn transform(&self, texts: &[&str]) -> Result<Vec<FeatureVector>, InferenceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![0.5f32; 8]).collect())
        }
    }

    /// Vectorizer double that fails the test if the ML path is ever taken.
    struct UnreachableVectorizer;

    impl Vectorizer for UnreachableVectorizer {
        fn transform(&self, texts: &[&str]) -> Result<Vec<FeatureVector>, InferenceError> {
            panic!("vectorizer must not run for triage-resolved cases: {texts:?}");
        }
    }

    fn engine(config: TriageConfig, vectorizer: Arc<dyn Vectorizer>) -> Arc<TriageEngine> {
        let models = ModelArtifacts::new(
            vectorizer,
            Arc::new(MockClassifier::returning(0)),
            Arc::new(MockClassifier::returning(1)),
            Arc::new(StaticLabelEncoder::new(["Gastritis", "Migraine"])),
            Arc::new(StaticLabelEncoder::new(["Gastroenterologist", "Neurologist"])),
        );
        Arc::new(TriageEngine::new(config, models))
    }

    fn default_engine() -> Arc<TriageEngine> {
        engine(
            TriageConfig::severity_gated(),
            Arc::new(CountingVectorizer::new()),
        )
    }

    fn resolved_session(engine: Arc<TriageEngine>) -> Session {
        let mut session = Session::new(engine);
        session.submit_symptom("stomach pain").unwrap();
        session.submit_duration(10).unwrap();
        session.submit_severity(Severity::Severe).unwrap();
        session
    }

    // ── Step gating ────────────────────────────────────────

    #[test]
    fn operations_are_rejected_out_of_step() {
        let mut session = Session::new(default_engine());

        let err = session.submit_duration(3).unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState(InvalidStateError {
                expected: DialogueStep::AwaitingDuration,
                actual: DialogueStep::AwaitingSymptom,
            })
        ));
        let err = session.submit_severity(Severity::Mild).unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));
        let err = session.recommendation().unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));
        let err = session.reset().unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));

        // State untouched by any of the rejected calls.
        assert_eq!(session.step(), DialogueStep::AwaitingSymptom);
        assert!(session.symptom().is_none());
        assert!(session.duration_days().is_none());
        assert!(session.severity().is_none());
    }

    #[test]
    fn symptom_cannot_be_submitted_twice() {
        let mut session = Session::new(default_engine());
        session.submit_symptom("fever").unwrap();

        let err = session.submit_symptom("cold").unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));
        assert_eq!(session.symptom(), Some("fever"));
    }

    // ── Symptom validation ─────────────────────────────────

    #[test]
    fn empty_and_blank_symptoms_are_rejected() {
        let mut session = Session::new(default_engine());

        for input in ["", "   ", "\t\n"] {
            let err = session.submit_symptom(input).unwrap_err();
            assert!(matches!(
                err,
                SessionError::Validation(ValidationError::EmptySymptom)
            ));
            assert_eq!(session.step(), DialogueStep::AwaitingSymptom);
        }

        session.submit_symptom("fever").unwrap();
        assert_eq!(session.step(), DialogueStep::AwaitingDuration);
    }

    #[test]
    fn symptom_is_stored_trimmed() {
        let mut session = Session::new(default_engine());
        session.submit_symptom("  fever  ").unwrap();
        assert_eq!(session.symptom(), Some("fever"));
    }

    // ── Duration validation ────────────────────────────────

    #[test]
    fn duration_bounds_are_inclusive() {
        for days in [0, 30] {
            let mut session = Session::new(default_engine());
            session.submit_symptom("fever").unwrap();
            session.submit_duration(days).unwrap();
            assert_eq!(session.duration_days(), Some(days));
        }
    }

    #[test]
    fn out_of_bounds_duration_is_rejected() {
        let mut session = Session::new(default_engine());
        session.submit_symptom("fever").unwrap();

        let err = session.submit_duration(31).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Validation(ValidationError::DurationOutOfRange {
                value: 31,
                min: 0,
                max: 30,
            })
        ));
        assert_eq!(session.step(), DialogueStep::AwaitingDuration);
        assert!(session.duration_days().is_none());
    }

    // ── Severity parsing ───────────────────────────────────

    #[test]
    fn severity_parses_leniently() {
        assert_eq!("mild".parse::<Severity>().unwrap(), Severity::Mild);
        assert_eq!(" Moderate ".parse::<Severity>().unwrap(), Severity::Moderate);
        assert_eq!("SEVERE".parse::<Severity>().unwrap(), Severity::Severe);
    }

    #[test]
    fn unknown_severity_is_a_validation_error() {
        let err = "critical".parse::<Severity>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownSeverity("critical".into()));
    }

    #[test]
    fn severity_levels_are_ordered() {
        assert!(Severity::Mild < Severity::Moderate);
        assert!(Severity::Moderate < Severity::Severe);
    }

    // ── Recommendation paths ───────────────────────────────

    #[test]
    fn short_mild_known_symptom_resolves_to_configured_tablet() {
        let engine = engine(
            TriageConfig::severity_gated(),
            Arc::new(UnreachableVectorizer),
        );
        let mut session = Session::new(engine);
        session.submit_symptom("fever").unwrap();
        session.submit_duration(1).unwrap();
        session.submit_severity(Severity::Mild).unwrap();

        match session.recommendation().unwrap() {
            Recommendation::Medication(advice) => {
                assert_eq!(advice.symptom, "fever");
                assert_eq!(advice.suggested_tablet, "Paracetamol 500mg – 3 times a day");
            }
            other => panic!("expected medication advice, got {other:?}"),
        }
    }

    #[test]
    fn short_mild_unlisted_symptom_gets_generic_advice() {
        let engine = engine(
            TriageConfig::severity_gated(),
            Arc::new(UnreachableVectorizer),
        );
        let mut session = Session::new(engine);
        session.submit_symptom("itchy elbow").unwrap();
        session.submit_duration(1).unwrap();
        session.submit_severity(Severity::Mild).unwrap();

        match session.recommendation().unwrap() {
            Recommendation::Medication(advice) => {
                assert_eq!(advice.suggested_tablet, GENERIC_ADVICE);
            }
            other => panic!("expected medication advice, got {other:?}"),
        }
    }

    #[test]
    fn severe_long_complaint_resolves_clinically() {
        let session = resolved_session(default_engine());
        match session.recommendation().unwrap() {
            Recommendation::Clinical(clinical) => {
                assert_eq!(clinical.predicted_disease, "Gastritis");
                assert_eq!(clinical.predicted_specialist, "Neurologist");
                assert_eq!(clinical.provider_name.as_deref(), Some("Dr. Manoj"));
            }
            other => panic!("expected clinical recommendation, got {other:?}"),
        }
    }

    #[test]
    fn recommendation_is_idempotent_and_uncached() {
        let vectorizer = Arc::new(CountingVectorizer::new());
        let engine = engine(TriageConfig::severity_gated(), vectorizer.clone());
        let session = resolved_session(engine);

        let first = session.recommendation().unwrap();
        let second = session.recommendation().unwrap();
        assert_eq!(first, second);
        // No caching: each call vectorizes the symptom once.
        assert_eq!(vectorizer.calls.load(Ordering::SeqCst), 2);
        assert_eq!(session.step(), DialogueStep::Resolved);
    }

    // ── Two-question profile ───────────────────────────────

    #[test]
    fn duration_gated_profile_resolves_after_duration() {
        let engine = engine(
            TriageConfig::duration_gated(),
            Arc::new(UnreachableVectorizer),
        );
        let mut session = Session::new(engine);
        session.submit_symptom("cold").unwrap();
        session.submit_duration(2).unwrap();

        assert_eq!(session.step(), DialogueStep::Resolved);
        let err = session.submit_severity(Severity::Mild).unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));

        match session.recommendation().unwrap() {
            Recommendation::Medication(advice) => {
                assert_eq!(advice.suggested_tablet, "Cetirizine – 1 tablet at night");
            }
            other => panic!("expected medication advice, got {other:?}"),
        }
    }

    // ── Reset ──────────────────────────────────────────────

    #[test]
    fn reset_clears_answers_and_restarts() {
        let mut session = resolved_session(default_engine());
        let old_id = session.id();

        session.reset().unwrap();

        assert_eq!(session.step(), DialogueStep::AwaitingSymptom);
        assert!(session.symptom().is_none());
        assert!(session.duration_days().is_none());
        assert!(session.severity().is_none());
        assert_ne!(session.id(), old_id);
    }

    #[test]
    fn dialogue_after_reset_is_independent() {
        let engine = default_engine();
        let mut session = resolved_session(engine);
        session.reset().unwrap();

        session.submit_symptom("headache").unwrap();
        session.submit_duration(1).unwrap();
        session.submit_severity(Severity::Mild).unwrap();

        match session.recommendation().unwrap() {
            Recommendation::Medication(advice) => {
                assert_eq!(advice.symptom, "headache");
                assert_eq!(advice.suggested_tablet, "Dolo 650mg – 1 tablet");
            }
            other => panic!("expected medication advice, got {other:?}"),
        }
    }
}
