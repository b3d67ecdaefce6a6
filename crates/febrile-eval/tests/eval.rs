//! Evaluator properties over arbitrary prediction pairs.

use febrile_eval::{all_class_metrics, evaluate};
use febrile_model::{ClassLabel, Diagnosis};
use proptest::prelude::*;

fn arb_diagnosis() -> impl Strategy<Value = Diagnosis> {
    prop_oneof![
        8 => (0usize..3).prop_map(|i| Diagnosis::Known(ClassLabel::ALL[i])),
        1 => "[a-z]{1,8}".prop_map(Diagnosis::Unrecognized),
    ]
}

#[test]
fn reference_matrix_from_pairs() {
    let rows = [[25u64, 3, 2], [4, 20, 1], [2, 3, 21]];
    let mut pairs = Vec::new();
    for (actual, row) in ClassLabel::ALL.into_iter().zip(rows) {
        for (predicted, count) in ClassLabel::ALL.into_iter().zip(row) {
            for _ in 0..count {
                pairs.push((Diagnosis::from(actual), Diagnosis::from(predicted)));
            }
        }
    }
    let evaluation = evaluate(pairs);
    assert_eq!(evaluation.matrix.rows(), &rows);
    assert!((evaluation.metrics.accuracy - 81.48).abs() < 0.01);
}

proptest! {
    #[test]
    fn matrix_accounts_for_every_pair(
        pairs in prop::collection::vec((arb_diagnosis(), arb_diagnosis()), 0..200),
    ) {
        let known = pairs
            .iter()
            .filter(|(a, p)| a.label().is_some() && p.label().is_some())
            .count() as u64;
        let correct = pairs
            .iter()
            .filter(|(a, p)| a.label().is_some() && a.label() == p.label())
            .count() as u64;
        let total = pairs.len() as u64;

        let evaluation = evaluate(pairs);
        prop_assert_eq!(evaluation.matrix.total(), known);
        prop_assert_eq!(evaluation.skipped, total - known);
        prop_assert_eq!(evaluation.matrix.trace(), correct);

        let metrics = evaluation.metrics;
        for score in [metrics.accuracy, metrics.precision, metrics.recall, metrics.f1_score] {
            prop_assert!((0.0..=100.0 + 1e-9).contains(&score));
        }
        if known > 0 {
            let expected = correct as f64 / known as f64 * 100.0;
            prop_assert!((metrics.accuracy - expected).abs() < 1e-9);
        }
        for class in all_class_metrics(&evaluation.matrix) {
            let cells = class.true_positives
                + class.false_positives
                + class.false_negatives
                + class.true_negatives;
            prop_assert_eq!(cells, known);
        }
    }
}
