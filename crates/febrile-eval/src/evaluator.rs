//! Folding prediction pairs into a confusion matrix.

use serde::Serialize;
use tracing::{debug, warn};

use febrile_model::{ConfusionMatrix, Diagnosis, Metrics};

use crate::scores::metrics_from_matrix;

/// Matrix and scores for one run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evaluation {
    pub matrix: ConfusionMatrix,
    pub metrics: Metrics,
    /// Pairs left out because either side is not a known class.
    pub skipped: u64,
}

impl Evaluation {
    /// Pairs that made it into the matrix.
    pub fn evaluated(&self) -> u64 {
        self.matrix.total()
    }
}

/// Tallies `(actual, predicted)` pairs and derives the aggregate metrics.
pub fn evaluate<I>(pairs: I) -> Evaluation
where
    I: IntoIterator<Item = (Diagnosis, Diagnosis)>,
{
    let mut matrix = ConfusionMatrix::new();
    let mut skipped = 0u64;
    for (actual, predicted) in pairs {
        match (actual.label(), predicted.label()) {
            (Some(actual), Some(predicted)) => matrix.record(actual, predicted),
            _ => skipped += 1,
        }
    }
    if skipped > 0 {
        warn!(skipped, "pairs outside the known classes were not evaluated");
    }
    let metrics = metrics_from_matrix(&matrix);
    debug!(
        evaluated = matrix.total(),
        accuracy = metrics.accuracy,
        "evaluation complete"
    );
    Evaluation {
        matrix,
        metrics,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use febrile_model::ClassLabel;

    #[test]
    fn unrecognized_pairs_are_skipped() {
        let pairs = vec![
            (Diagnosis::from(ClassLabel::Dengue), Diagnosis::from(ClassLabel::Dengue)),
            (
                Diagnosis::Unrecognized("Zika".to_string()),
                Diagnosis::from(ClassLabel::Malaria),
            ),
            (
                Diagnosis::from(ClassLabel::Malaria),
                Diagnosis::Unrecognized("Chikungunya".to_string()),
            ),
        ];
        let evaluation = evaluate(pairs);
        assert_eq!(evaluation.evaluated(), 1);
        assert_eq!(evaluation.skipped, 2);
        assert_eq!(evaluation.metrics.accuracy, 100.0);
    }

    #[test]
    fn no_pairs_scores_zero() {
        let evaluation = evaluate(Vec::new());
        assert_eq!(evaluation.evaluated(), 0);
        assert_eq!(evaluation.metrics, Metrics::default());
    }
}
