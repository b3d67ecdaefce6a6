//! Options controlling a batch evaluation run.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which rule table stands in for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Threshold cascade, 85% simulated base accuracy.
    #[default]
    Logistic,
    /// Additive symptom scores, 88% simulated base accuracy.
    Neural,
}

impl ModelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelKind::Logistic => "logistic",
            ModelKind::Neural => "neural",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Logistic => "Logistic Regression",
            ModelKind::Neural => "Neural Network",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with diagnosis values outside the three known classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPolicy {
    /// Leave the row out of balancing and evaluation and report it.
    #[default]
    Quarantine,
    /// Fail the run.
    Reject,
}

/// What to do with rows missing the core numeric features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissingFeaturePolicy {
    /// Treat missing or unparseable values as 0.
    #[default]
    DefaultZero,
    /// Drop rows lacking platelets, temperature or hemoglobin.
    Exclude,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationOptions {
    pub model: ModelKind,
    /// Oversample minority classes up to the majority count.
    pub balance: bool,
    pub label_policy: LabelPolicy,
    pub missing_features: MissingFeaturePolicy,
    /// Number of per-patient rows shown in the summary.
    pub preview_rows: usize,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            model: ModelKind::default(),
            balance: true,
            label_policy: LabelPolicy::default(),
            missing_features: MissingFeaturePolicy::default(),
            preview_rows: 20,
        }
    }
}

impl EvaluationOptions {
    pub fn new(model: ModelKind) -> Self {
        Self {
            model,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_balance(mut self, enable: bool) -> Self {
        self.balance = enable;
        self
    }

    #[must_use]
    pub fn with_label_policy(mut self, policy: LabelPolicy) -> Self {
        self.label_policy = policy;
        self
    }

    #[must_use]
    pub fn with_missing_features(mut self, policy: MissingFeaturePolicy) -> Self {
        self.missing_features = policy;
        self
    }

    #[must_use]
    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }
}
