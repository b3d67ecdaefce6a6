//! Data model shared by the febrile-dx crates.
//!
//! A [`Record`] is one spreadsheet row or one patient entered by hand. Once its
//! diagnosis has been normalized to a [`ClassLabel`] it becomes a [`Sample`],
//! which the balancing, prediction and evaluation stages consume.

pub mod error;
pub mod label;
pub mod metrics;
pub mod options;
pub mod record;
pub mod sample;

pub use error::{ModelError, Result};
pub use label::{ClassLabel, Diagnosis};
pub use metrics::{ClassMetrics, ConfusionMatrix, Metrics};
pub use options::{EvaluationOptions, LabelPolicy, MissingFeaturePolicy, ModelKind};
pub use record::{CellValue, Record};
pub use sample::{ClassCount, ClassCounts, Sample};
