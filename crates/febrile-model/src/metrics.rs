//! Evaluation results: confusion matrix and derived scores.

use serde::Serialize;

use crate::label::ClassLabel;

const N: usize = ClassLabel::COUNT;

/// 3×3 grid of (actual, predicted) counts in [`ClassLabel::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ConfusionMatrix {
    cells: [[u64; N]; N],
}

impl ConfusionMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(cells: [[u64; N]; N]) -> Self {
        Self { cells }
    }

    pub fn record(&mut self, actual: ClassLabel, predicted: ClassLabel) {
        self.cells[actual.index()][predicted.index()] += 1;
    }

    pub fn get(&self, actual: ClassLabel, predicted: ClassLabel) -> u64 {
        self.cells[actual.index()][predicted.index()]
    }

    pub fn rows(&self) -> &[[u64; N]; N] {
        &self.cells
    }

    pub fn total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    pub fn trace(&self) -> u64 {
        (0..N).map(|idx| self.cells[idx][idx]).sum()
    }

    /// Samples whose actual class is `label`.
    pub fn row_sum(&self, label: ClassLabel) -> u64 {
        self.cells[label.index()].iter().sum()
    }

    /// Samples predicted as `label`.
    pub fn column_sum(&self, label: ClassLabel) -> u64 {
        self.cells.iter().map(|row| row[label.index()]).sum()
    }
}

/// Aggregate scores, all percentages in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
}

/// One class viewed one-vs-rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: ClassLabel,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_negatives: u64,
}
