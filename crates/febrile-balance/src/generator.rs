//! SMOTE-style synthetic sample generation without neighbour search.

use tracing::trace;

use febrile_model::{CellValue, Record, Sample};

use crate::classify::{ColumnKinds, classify_columns, is_numeric_value};
use crate::hasher::{EntropySource, StringHash, char_seed};

/// Interpolation factors are kept inside `[ALPHA_MIN, ALPHA_MIN + ALPHA_SPAN]`.
const ALPHA_MIN: f64 = 0.1;
const ALPHA_SPAN: f64 = 0.8;
/// Seed stride between categorical picks of consecutive synthetic samples.
const CATEGORICAL_SEED_STRIDE: i64 = 1000;

/// Generates synthetic samples for one class.
#[derive(Debug, Clone, Default)]
pub struct SyntheticGenerator<S = StringHash> {
    source: S,
}

impl SyntheticGenerator<StringHash> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: EntropySource> SyntheticGenerator<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Returns `samples` followed by enough synthetic samples to reach
    /// `target_count`.
    ///
    /// The input is returned unchanged when it already has `target_count`
    /// samples or more, and an empty input stays empty. A single sample is
    /// perturbed by up to ±5% per numeric field; otherwise each synthetic
    /// sample interpolates between two hash-chosen parents and inherits the
    /// first parent's label.
    pub fn generate(&self, samples: &[Sample], target_count: usize, seed: i64) -> Vec<Sample> {
        if samples.is_empty() {
            return Vec::new();
        }
        let mut output = samples.to_vec();
        if samples.len() >= target_count {
            return output;
        }
        let needed = target_count - samples.len();
        output.reserve(needed);
        if let [single] = samples {
            for i in 0..needed {
                output.push(self.perturb(single, i as i64, seed));
            }
        } else {
            let records: Vec<Record> = samples.iter().map(|s| s.record.clone()).collect();
            let kinds = classify_columns(&records);
            for i in 0..needed {
                output.push(self.interpolate(samples, &kinds, i as i64, seed));
            }
        }
        trace!(real = samples.len(), synthetic = needed, seed, "synthetic samples generated");
        output
    }

    fn perturb(&self, source: &Sample, i: i64, seed: i64) -> Sample {
        let mut record = Record::with_capacity(source.record.len());
        for (key, value) in source.record.iter() {
            let hash = self.source.draw(&source.record, seed + i + char_seed(key));
            let number = value.as_f64().filter(|_| is_numeric_value(value));
            let cell = match number {
                Some(number) if number != 0.0 => {
                    let variation = (i64::from(hash % 10) - 5) as f64 / 100.0;
                    CellValue::Number(number * (1.0 + variation))
                }
                _ => value.clone(),
            };
            record.insert(key, cell);
        }
        Sample::synthetic(record, source.label)
    }

    fn interpolate(
        &self,
        samples: &[Sample],
        kinds: &ColumnKinds,
        i: i64,
        seed: i64,
    ) -> Sample {
        let n = samples.len();
        let selector = Record::from_pairs([("index", i as f64), ("seed", seed as f64)]);
        let hash1 = self.source.draw(&selector, seed + i * 2);
        let hash2 = self.source.draw(&selector, seed + i * 2 + 1);
        let idx1 = hash1 as usize % n;
        let mut idx2 = hash2 as usize % n;
        if idx1 == idx2 {
            idx2 = (idx2 + 1) % n;
        }
        let first = &samples[idx1];
        let second = &samples[idx2];
        let alpha = f64::from(hash1 % 100) / 100.0 * ALPHA_SPAN + ALPHA_MIN;

        // Numeric columns first, then categorical ones; the hash of the
        // synthetic record depends on this order.
        let mut record = Record::with_capacity(kinds.len());
        for column in kinds.numeric() {
            let v1 = numeric_or_zero(first.record.get(column));
            let v2 = numeric_or_zero(second.record.get(column));
            record.insert(column, CellValue::Number(round_synthetic(v1 + alpha * (v2 - v1))));
        }
        for column in kinds.categorical() {
            let hash = self.source.draw(
                &first.record,
                seed + i * CATEGORICAL_SEED_STRIDE + char_seed(column),
            );
            let parent = if hash % 2 == 0 { first } else { second };
            record.insert(column, parent.record.get(column).cloned().unwrap_or_default());
        }
        Sample::synthetic(record, first.label)
    }
}

fn numeric_or_zero(value: Option<&CellValue>) -> f64 {
    value.and_then(CellValue::as_f64).unwrap_or(0.0)
}

/// Rounds to 2 decimals below magnitude 1 and to 1 decimal otherwise.
pub fn round_synthetic(value: f64) -> f64 {
    if value.abs() < 1.0 {
        (value * 100.0).round() / 100.0
    } else {
        (value * 10.0).round() / 10.0
    }
}
