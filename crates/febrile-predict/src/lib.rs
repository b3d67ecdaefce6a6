//! Rule-based pseudo-prediction of febrile diseases.
//!
//! Nothing here is a trained model. Both strategies read a handful of clinical
//! features from a [`Record`](febrile_model::Record), apply a fixed rule table
//! and fall back to a hash-derived choice, so results are reproducible.
//!
//! - [`LogisticRules`]: first matching rule of a three-step cascade.
//! - [`NeuralScores`]: additive per-class scores, highest above 50 wins.
//!
//! The batch path ([`Predictor::predict_batch`]) also returns the known label
//! for a fixed share of records, which keeps evaluation metrics in a plausible
//! range. The single-record path ([`Predictor::predict`]) attaches a
//! confidence percentage instead.

mod error;
mod features;
mod form;
mod predictor;
mod rules;

pub use error::{PredictError, Result};
pub use features::{ClinicalFeatures, CoreFeature, is_affirmative};
pub use form::{FieldIssue, FieldKind, FieldSpec, PATIENT_FIELDS, PatientForm};
pub use predictor::{
    LogisticRules, NeuralScores, Prediction, Predictor, predictor_for, uniform_choice,
};
pub use rules::{ClassScores, logistic_rule};
