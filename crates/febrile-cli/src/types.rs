use std::path::PathBuf;

use serde::Serialize;

use febrile_eval::Evaluation;
use febrile_ingest::UnrecognizedRow;
use febrile_model::{ClassCounts, ClassLabel, ClassMetrics, EvaluationOptions};

/// One evaluated sample, real or synthetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictedSample {
    /// 1-based position in the balanced sample list.
    pub patient_id: usize,
    pub actual: ClassLabel,
    pub predicted: ClassLabel,
    pub synthetic: bool,
}

impl PredictedSample {
    pub fn is_correct(&self) -> bool {
        self.actual == self.predicted
    }
}

/// Files written by the output stage.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub results_csv: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

#[derive(Debug)]
pub struct EvaluationRun {
    pub source: PathBuf,
    pub options: EvaluationOptions,
    pub diagnosis_column: String,
    /// Per-class counts before and after balancing.
    pub counts: ClassCounts,
    pub target_count: usize,
    pub unrecognized: Vec<UnrecognizedRow>,
    pub blank_diagnosis: usize,
    /// Rows dropped for lacking core lab values.
    pub excluded_missing: usize,
    pub predictions: Vec<PredictedSample>,
    pub evaluation: Evaluation,
    pub class_metrics: Vec<ClassMetrics>,
    pub outputs: OutputPaths,
}
