//! Medtriage — local-first symptom triage and recommendation core.
//!
//! The decision pipeline behind a guided symptom-checker dialogue: a
//! [`Session`] collects one symptom, its duration, and (profile permitting)
//! its severity; a deterministic triage rule resolves apparently minor
//! complaints to a tablet suggestion; everything else flows through a
//! text-to-vector-to-label inference pipeline producing a disease and
//! specialist recommendation, with a provider looked up per specialty.
//!
//! The crate owns no UI, no persistence, and no model training. Model
//! artifacts enter through the [`inference`] traits, loaded once by the host
//! at process start; the `onnx-models` feature provides stock ONNX Runtime
//! adapters.

pub mod config;
pub mod engine;
pub mod inference;
pub mod recommendation;
pub mod session;
pub mod triage;

pub use config::{TriageConfig, TriagePolicy};
pub use engine::TriageEngine;
pub use inference::{
    Classifier, FeatureVector, InferenceError, LabelEncoder, ModelArtifacts, StaticLabelEncoder,
    Vectorizer,
};
pub use recommendation::{
    ClinicalRecommendation, MedicationAdvice, Recommendation, GENERIC_ADVICE, NO_PROVIDER_ADVISORY,
};
pub use session::{
    DialogueStep, InvalidStateError, Session, SessionError, Severity, ValidationError,
};
