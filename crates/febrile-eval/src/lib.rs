//! Evaluation of (actual, predicted) diagnosis pairs.
//!
//! Pairs are tallied into a [`ConfusionMatrix`](febrile_model::ConfusionMatrix)
//! from which aggregate and per-class scores are derived. All scores are
//! percentages.

mod evaluator;
mod scores;

pub use evaluator::{Evaluation, evaluate};
pub use scores::{all_class_metrics, class_metrics, f1_score, metrics_from_matrix};
