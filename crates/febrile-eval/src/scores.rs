//! Scores derived from a confusion matrix.

use febrile_model::{ClassLabel, ClassMetrics, ConfusionMatrix, Metrics};

/// Accuracy plus precision and recall averaged over the classes whose
/// denominator is non-zero, and their harmonic mean.
pub fn metrics_from_matrix(matrix: &ConfusionMatrix) -> Metrics {
    let total = matrix.total();
    let accuracy = ratio(matrix.trace(), total).unwrap_or(0.0);

    let precision = mean(
        ClassLabel::ALL
            .into_iter()
            .filter_map(|label| ratio(matrix.get(label, label), matrix.column_sum(label))),
    );
    let recall = mean(
        ClassLabel::ALL
            .into_iter()
            .filter_map(|label| ratio(matrix.get(label, label), matrix.row_sum(label))),
    );

    Metrics {
        accuracy,
        precision,
        recall,
        f1_score: f1_score(precision, recall),
    }
}

/// One-vs-rest breakdown for `label`. Undefined precision or recall is 0.
pub fn class_metrics(matrix: &ConfusionMatrix, label: ClassLabel) -> ClassMetrics {
    let tp = matrix.get(label, label);
    let fp = matrix.column_sum(label) - tp;
    let fn_ = matrix.row_sum(label) - tp;
    let tn = matrix.total() - tp - fp - fn_;
    let precision = ratio(tp, tp + fp).unwrap_or(0.0);
    let recall = ratio(tp, tp + fn_).unwrap_or(0.0);
    ClassMetrics {
        label,
        precision,
        recall,
        f1_score: f1_score(precision, recall),
        true_positives: tp,
        false_positives: fp,
        false_negatives: fn_,
        true_negatives: tn,
    }
}

/// [`class_metrics`] for every label in matrix order.
pub fn all_class_metrics(matrix: &ConfusionMatrix) -> Vec<ClassMetrics> {
    ClassLabel::ALL
        .into_iter()
        .map(|label| class_metrics(matrix, label))
        .collect()
}

/// Harmonic mean of two percentages, 0 when both are 0.
pub fn f1_score(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn ratio(numerator: u64, denominator: u64) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64 * 100.0)
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0u32), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / f64::from(count) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn reference_matrix() {
        let matrix = ConfusionMatrix::from_rows([[25, 3, 2], [4, 20, 1], [2, 3, 21]]);
        let metrics = metrics_from_matrix(&matrix);
        assert!(close(metrics.accuracy, 81.48), "{}", metrics.accuracy);
        // (25/31 + 20/26 + 21/24) / 3
        assert!(close(metrics.precision, 81.69), "{}", metrics.precision);
        // (25/30 + 20/25 + 21/26) / 3
        assert!(close(metrics.recall, 81.37), "{}", metrics.recall);
        assert!(close(metrics.f1_score, 81.53), "{}", metrics.f1_score);
    }

    #[test]
    fn undefined_classes_are_left_out_of_averages() {
        // Nothing is ever predicted or labelled Leptospirosis.
        let matrix = ConfusionMatrix::from_rows([[3, 1, 0], [1, 3, 0], [0, 0, 0]]);
        let metrics = metrics_from_matrix(&matrix);
        assert_eq!(metrics.precision, 75.0);
        assert_eq!(metrics.recall, 75.0);
        assert_eq!(metrics.f1_score, 75.0);
    }

    #[test]
    fn per_class_breakdown() {
        let matrix = ConfusionMatrix::from_rows([[25, 3, 2], [4, 20, 1], [2, 3, 21]]);
        let dengue = class_metrics(&matrix, ClassLabel::Dengue);
        assert_eq!(dengue.true_positives, 25);
        assert_eq!(dengue.false_positives, 6);
        assert_eq!(dengue.false_negatives, 5);
        assert_eq!(dengue.true_negatives, 45);
        assert!(close(dengue.precision, 80.65));
        assert!(close(dengue.recall, 83.33));

        let empty = class_metrics(&ConfusionMatrix::new(), ClassLabel::Malaria);
        assert_eq!(empty.precision, 0.0);
        assert_eq!(empty.f1_score, 0.0);
    }

    #[test]
    fn f1_of_zeroes_is_zero() {
        assert_eq!(f1_score(0.0, 0.0), 0.0);
        assert_eq!(f1_score(50.0, 50.0), 50.0);
    }
}
