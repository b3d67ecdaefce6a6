//! Equalizes per-class sample counts.

use std::collections::BTreeMap;

use tracing::{debug, info};

use febrile_model::{ClassCounts, ClassLabel, Record, Sample};

use crate::error::{BalanceError, Result};
use crate::generator::SyntheticGenerator;
use crate::hasher::{EntropySource, StringHash, char_seed};

/// Samples in class order plus the per-class counts that produced them.
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    pub samples: Vec<Sample>,
    pub counts: ClassCounts,
    /// Per-class size every non-empty class was raised to.
    pub target_count: usize,
}

/// Generator seed for a class, distinct per label.
pub fn class_seed(label: ClassLabel) -> i64 {
    char_seed(label.as_str()) * 1000
}

#[derive(Debug, Clone, Default)]
pub struct ClassBalancer<S = StringHash> {
    generator: SyntheticGenerator<S>,
}

impl ClassBalancer<StringHash> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: EntropySource> ClassBalancer<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            generator: SyntheticGenerator::with_source(source),
        }
    }

    /// Oversamples every class up to the majority class count.
    ///
    /// Samples are concatenated in [`ClassLabel::ALL`] order, real samples of a
    /// class first. Classes without real samples stay empty.
    pub fn balance(&self, by_class: &BTreeMap<ClassLabel, Vec<Record>>) -> Result<BalanceOutcome> {
        let target_count = majority_count(by_class)?;
        let mut samples = Vec::with_capacity(target_count * ClassLabel::COUNT);
        let mut counts = ClassCounts::default();
        for label in ClassLabel::ALL {
            let real = real_samples(by_class, label);
            let balanced = self.generator.generate(&real, target_count, class_seed(label));
            let count = counts.get_mut(label);
            count.original = real.len();
            count.synthetic = balanced.len() - real.len();
            debug!(
                class = %label,
                original = count.original,
                synthetic = count.synthetic,
                "class balanced"
            );
            samples.extend(balanced);
        }
        info!(
            target_count,
            real = counts.total_original(),
            synthetic = counts.total_synthetic(),
            "classes balanced"
        );
        Ok(BalanceOutcome {
            samples,
            counts,
            target_count,
        })
    }
}

/// Real samples only, in the same layout as [`ClassBalancer::balance`].
pub fn passthrough(by_class: &BTreeMap<ClassLabel, Vec<Record>>) -> Result<BalanceOutcome> {
    let target_count = majority_count(by_class)?;
    let mut samples = Vec::new();
    let mut counts = ClassCounts::default();
    for label in ClassLabel::ALL {
        let real = real_samples(by_class, label);
        counts.get_mut(label).original = real.len();
        samples.extend(real);
    }
    Ok(BalanceOutcome {
        samples,
        counts,
        target_count,
    })
}

fn majority_count(by_class: &BTreeMap<ClassLabel, Vec<Record>>) -> Result<usize> {
    let max = by_class.values().map(Vec::len).max().unwrap_or(0);
    if max == 0 {
        return Err(BalanceError::NoSamples);
    }
    Ok(max)
}

fn real_samples(by_class: &BTreeMap<ClassLabel, Vec<Record>>, label: ClassLabel) -> Vec<Sample> {
    by_class
        .get(&label)
        .map(|records| {
            records
                .iter()
                .map(|record| Sample::real(record.clone(), label))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_seeds_are_distinct() {
        assert_eq!(class_seed(ClassLabel::Dengue), 68_000);
        assert_eq!(class_seed(ClassLabel::Malaria), 77_000);
        assert_eq!(class_seed(ClassLabel::Leptospirosis), 76_000);
    }

    #[test]
    fn all_empty_classes_fail() {
        let by_class: BTreeMap<ClassLabel, Vec<Record>> =
            ClassLabel::ALL.into_iter().map(|l| (l, Vec::new())).collect();
        assert!(matches!(
            ClassBalancer::new().balance(&by_class),
            Err(BalanceError::NoSamples)
        ));
        assert!(matches!(passthrough(&by_class), Err(BalanceError::NoSamples)));
    }
}
