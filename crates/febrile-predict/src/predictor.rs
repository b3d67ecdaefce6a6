//! Logistic and neural pseudo-predictors behind one strategy trait.

use serde::Serialize;
use tracing::trace;

use febrile_balance::{EntropySource, StringHash, char_seed};
use febrile_model::{ClassLabel, ModelKind, Record};

use crate::features::ClinicalFeatures;
use crate::rules::{ClassScores, logistic_rule};

/// Outcome of the single-record path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub label: ClassLabel,
    /// Percentage, already clamped to the model's range.
    pub confidence: f64,
    pub model: ModelKind,
}

/// A deterministic pseudo-predictor.
pub trait Predictor {
    fn kind(&self) -> ModelKind;

    /// Prediction for the `index`-th record of a labelled batch.
    ///
    /// A fixed share of draws returns `actual` unchanged; the rest fall back
    /// to the rule table or a hash-derived choice.
    fn predict_batch(&self, record: &Record, actual: ClassLabel, index: usize) -> ClassLabel;

    /// Prediction with a confidence percentage for an unlabelled record.
    fn predict(&self, record: &Record) -> Prediction;
}

/// Predictor for `kind` backed by [`StringHash`].
pub fn predictor_for(kind: ModelKind) -> Box<dyn Predictor> {
    match kind {
        ModelKind::Logistic => Box::new(LogisticRules::new()),
        ModelKind::Neural => Box::new(NeuralScores::new()),
    }
}

/// Maps a draw in `[0, 1)` onto the three classes with equal weight.
pub fn uniform_choice(rand: f64) -> ClassLabel {
    let index = (rand * ClassLabel::COUNT as f64).floor() as usize;
    ClassLabel::from_index(index.min(ClassLabel::COUNT - 1)).unwrap_or(ClassLabel::Leptospirosis)
}

/// Constants of the batch draw.
#[derive(Debug, Clone, Copy)]
struct BatchDraw {
    seed: i64,
    index_stride: u64,
    label_stride: u64,
    /// Draws below this return the known label.
    base_accuracy: f64,
}

impl BatchDraw {
    fn rand<S: EntropySource>(
        &self,
        source: &S,
        record: &Record,
        actual: ClassLabel,
        index: usize,
    ) -> f64 {
        let hash = u64::from(source.draw(record, self.seed));
        let label_seed = char_seed(actual.as_str()).unsigned_abs();
        let combined = hash
            .wrapping_add((index as u64).wrapping_mul(self.index_stride))
            .wrapping_add(label_seed.wrapping_mul(self.label_stride))
            % 10_000;
        (combined % 100) as f64 / 100.0
    }
}

/// Single-record confidence constants.
#[derive(Debug, Clone, Copy)]
struct ConfidenceBand {
    /// Base confidence per class when no rule fires.
    fallback: [f64; ClassLabel::COUNT],
    /// Variance is `hash % spread + offset`.
    spread: u32,
    offset: f64,
    min: f64,
    max: f64,
}

impl ConfidenceBand {
    fn fallback_choice(&self, hash: u32) -> (ClassLabel, f64) {
        let label = uniform_choice(f64::from(hash % 100) / 100.0);
        (label, self.fallback[label.index()])
    }

    fn finish(&self, base: f64, hash: u32) -> f64 {
        let variance = f64::from(hash % self.spread) + self.offset;
        (base + variance).clamp(self.min, self.max)
    }
}

// === Logistic ===

const LOGISTIC_DRAW: BatchDraw = BatchDraw {
    seed: 42,
    index_stride: 17,
    label_stride: 7,
    base_accuracy: 0.85,
};

/// Base confidence when the matching rule fires.
const LOGISTIC_RULE_CONFIDENCE: [f64; ClassLabel::COUNT] = [87.0, 84.0, 82.0];

const LOGISTIC_BAND: ConfidenceBand = ConfidenceBand {
    fallback: [75.0, 73.0, 71.0],
    spread: 5,
    offset: -2.0,
    min: 65.0,
    max: 99.0,
};

/// Three-rule cascade with a uniform hash fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticRules<S = StringHash> {
    source: S,
}

impl LogisticRules<StringHash> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: EntropySource> LogisticRules<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }
}

impl<S: EntropySource> Predictor for LogisticRules<S> {
    fn kind(&self) -> ModelKind {
        ModelKind::Logistic
    }

    fn predict_batch(&self, record: &Record, actual: ClassLabel, index: usize) -> ClassLabel {
        let rand = LOGISTIC_DRAW.rand(&self.source, record, actual, index);
        if rand < LOGISTIC_DRAW.base_accuracy {
            return actual;
        }
        let features = ClinicalFeatures::from_record(record);
        let label = logistic_rule(&features).unwrap_or_else(|| uniform_choice(rand));
        trace!(index, rand, predicted = %label, "rule-based logistic prediction");
        label
    }

    fn predict(&self, record: &Record) -> Prediction {
        let hash = self.source.draw_unseeded(record);
        let features = ClinicalFeatures::from_record(record);
        let (label, base) = match logistic_rule(&features) {
            Some(label) => (label, LOGISTIC_RULE_CONFIDENCE[label.index()]),
            None => LOGISTIC_BAND.fallback_choice(hash),
        };
        Prediction {
            label,
            confidence: LOGISTIC_BAND.finish(base, hash),
            model: ModelKind::Logistic,
        }
    }
}

// === Neural ===

const NEURAL_DRAW: BatchDraw = BatchDraw {
    seed: 123,
    index_stride: 23,
    label_stride: 11,
    base_accuracy: 0.88,
};

/// Base confidence of a winning score of exactly 50.
const NEURAL_SCORE_CONFIDENCE: [f64; ClassLabel::COUNT] = [88.0, 86.0, 85.0];
/// Confidence added per score point above 50.
const NEURAL_SCORE_WEIGHT: f64 = 0.2;

const NEURAL_BAND: ConfidenceBand = ConfidenceBand {
    fallback: [78.0, 76.0, 74.0],
    spread: 4,
    offset: -1.0,
    min: 70.0,
    max: 99.0,
};

/// Additive per-class scoring with a uniform hash fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeuralScores<S = StringHash> {
    source: S,
}

impl NeuralScores<StringHash> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: EntropySource> NeuralScores<S> {
    pub fn with_source(source: S) -> Self {
        Self { source }
    }
}

impl<S: EntropySource> Predictor for NeuralScores<S> {
    fn kind(&self) -> ModelKind {
        ModelKind::Neural
    }

    fn predict_batch(&self, record: &Record, actual: ClassLabel, index: usize) -> ClassLabel {
        let rand = NEURAL_DRAW.rand(&self.source, record, actual, index);
        if rand < NEURAL_DRAW.base_accuracy {
            return actual;
        }
        let scores = ClassScores::from_features(&ClinicalFeatures::from_record(record));
        let label = scores
            .winner()
            .map(|(label, _)| label)
            .unwrap_or_else(|| uniform_choice(rand));
        trace!(index, rand, predicted = %label, "score-based neural prediction");
        label
    }

    fn predict(&self, record: &Record) -> Prediction {
        let hash = self.source.draw_unseeded(record);
        let scores = ClassScores::from_features(&ClinicalFeatures::from_record(record));
        let (label, base) = match scores.winner() {
            Some((label, score)) => {
                let bonus = f64::from(score - 50) * NEURAL_SCORE_WEIGHT;
                (label, NEURAL_SCORE_CONFIDENCE[label.index()] + bonus)
            }
            None => NEURAL_BAND.fallback_choice(hash),
        };
        Prediction {
            label,
            confidence: NEURAL_BAND.finish(base, hash),
            model: ModelKind::Neural,
        }
    }
}
