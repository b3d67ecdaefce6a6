//! Evaluation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the file, locate the diagnosis column, group rows by class
//! 2. **Features**: apply the missing-feature policy
//! 3. **Balance**: oversample every class to the majority count
//! 4. **Predict**: run the selected pseudo-predictor over every sample
//! 5. **Evaluate**: confusion matrix and metrics
//! 6. **Output**: results CSV and optional JSON report
//!
//! Each stage takes the output of the previous stage and returns typed results.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{Level, debug, info, trace, warn};

use febrile_balance::{BalanceOutcome, ClassBalancer, passthrough};
use febrile_eval::{Evaluation, all_class_metrics, evaluate as evaluate_pairs};
use febrile_ingest::{GroupedRecords, find_diagnosis_column, group_by_diagnosis, read_table};
use febrile_model::{
    ClassCounts, ClassLabel, ClassMetrics, ConfusionMatrix, Diagnosis, EvaluationOptions,
    LabelPolicy, Metrics, MissingFeaturePolicy, Record, Sample,
};
use febrile_predict::{ClinicalFeatures, Predictor};

use crate::logging::redact_value;
use crate::types::{EvaluationRun, OutputPaths, PredictedSample};

// ============================================================================
// Stage 1: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    /// Data rows read from the file, blank rows excluded.
    pub row_count: usize,
    pub diagnosis_column: String,
    pub grouped: GroupedRecords,
}

/// Read `path` and split its rows by normalized diagnosis.
///
/// Fails before any prediction when the file type is unsupported, the file
/// has no rows, no diagnosis column exists, or an unrecognized diagnosis is
/// met under [`LabelPolicy::Reject`].
pub fn ingest(path: &Path, policy: LabelPolicy) -> Result<IngestResult> {
    let table = read_table(path)?;
    let diagnosis_column = find_diagnosis_column(&table.headers)?;
    let grouped = group_by_diagnosis(&table, &diagnosis_column, policy)?;
    Ok(IngestResult {
        row_count: table.len(),
        diagnosis_column,
        grouped,
    })
}

// ============================================================================
// Stage 2: Missing features
// ============================================================================

/// Records kept after the missing-feature policy.
#[derive(Debug)]
pub struct FeatureResult {
    pub by_class: BTreeMap<ClassLabel, Vec<Record>>,
    /// Records lacking platelets, temperature or hemoglobin.
    pub incomplete: usize,
    /// Incomplete records dropped under [`MissingFeaturePolicy::Exclude`].
    pub excluded: usize,
}

/// Count records without core lab values and drop them when asked to.
pub fn apply_feature_policy(
    by_class: BTreeMap<ClassLabel, Vec<Record>>,
    policy: MissingFeaturePolicy,
) -> FeatureResult {
    let mut incomplete = 0usize;
    let mut excluded = 0usize;
    let mut kept = BTreeMap::new();
    for (label, records) in by_class {
        let mut class_records = Vec::with_capacity(records.len());
        for record in records {
            let missing = ClinicalFeatures::from_record(&record).missing_core();
            if missing.is_empty() {
                class_records.push(record);
                continue;
            }
            incomplete += 1;
            trace!(class = %label, missing = ?missing, "record lacks core lab values");
            match policy {
                MissingFeaturePolicy::DefaultZero => class_records.push(record),
                MissingFeaturePolicy::Exclude => excluded += 1,
            }
        }
        kept.insert(label, class_records);
    }
    if incomplete > 0 {
        match policy {
            MissingFeaturePolicy::DefaultZero => {
                warn!(incomplete, "records without core lab values scored with zeros");
            }
            MissingFeaturePolicy::Exclude => {
                warn!(excluded, "records without core lab values excluded");
            }
        }
    }
    FeatureResult {
        by_class: kept,
        incomplete,
        excluded,
    }
}

// ============================================================================
// Stage 3: Balance
// ============================================================================

/// Oversample to the majority class, or pass real samples through.
pub fn balance(
    by_class: &BTreeMap<ClassLabel, Vec<Record>>,
    enabled: bool,
) -> Result<BalanceOutcome> {
    let outcome = if enabled {
        ClassBalancer::new().balance(by_class)
    } else {
        debug!("balancing disabled");
        passthrough(by_class)
    };
    outcome.context("balance classes")
}

// ============================================================================
// Stage 4: Predict
// ============================================================================

/// Batch prediction over `samples`, indexed in list order.
pub fn predict(samples: &[Sample], predictor: &dyn Predictor) -> Vec<PredictedSample> {
    samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            let predicted = predictor.predict_batch(&sample.record, sample.label, index);
            if tracing::enabled!(Level::TRACE) {
                let record = sample.record.canonical_json().unwrap_or_default();
                trace!(
                    index,
                    actual = %sample.label,
                    predicted = %predicted,
                    record = %redact_value(&record),
                    "sample predicted"
                );
            }
            PredictedSample {
                patient_id: index + 1,
                actual: sample.label,
                predicted,
                synthetic: sample.is_synthetic,
            }
        })
        .collect()
}

// ============================================================================
// Stage 5: Evaluate
// ============================================================================

/// Confusion matrix, aggregate metrics and per-class breakdown.
pub fn evaluate(predictions: &[PredictedSample]) -> (Evaluation, Vec<ClassMetrics>) {
    let evaluation = evaluate_pairs(
        predictions
            .iter()
            .map(|p| (Diagnosis::from(p.actual), Diagnosis::from(p.predicted))),
    );
    let class_metrics = all_class_metrics(&evaluation.matrix);
    (evaluation, class_metrics)
}

// ============================================================================
// Stage 6: Output
// ============================================================================

/// Where and whether to write output files.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub output_dir: PathBuf,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
}

const REPORT_SCHEMA: &str = "febrile-dx.evaluation-report";
const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub source: String,
    pub options: &'a EvaluationOptions,
    pub diagnosis_column: &'a str,
    pub counts: &'a ClassCounts,
    pub target_count: usize,
    pub unrecognized: usize,
    pub blank_diagnosis: usize,
    pub excluded_missing: usize,
    pub evaluated: u64,
    pub skipped: u64,
    pub metrics: &'a Metrics,
    pub confusion_matrix: &'a ConfusionMatrix,
    pub class_metrics: &'a [ClassMetrics],
}

/// `<stem>_results.csv` for the given input file.
pub fn results_file_name(source: &Path) -> String {
    let stem = source
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("patients");
    format!("{stem}_results.csv")
}

/// Write the results CSV and, when requested, the JSON report.
pub fn output(config: &OutputConfig, run: &EvaluationRun) -> Result<OutputPaths> {
    if config.dry_run {
        info!("dry run: no files written");
        return Ok(OutputPaths::default());
    }
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("create {}", config.output_dir.display()))?;
    let results_path = config.output_dir.join(results_file_name(&run.source));
    write_results_csv(&results_path, &run.predictions)?;
    let report = match &config.report {
        Some(path) => {
            write_report_json(path, run)?;
            Some(path.clone())
        }
        None => None,
    };
    Ok(OutputPaths {
        results_csv: Some(results_path),
        report,
    })
}

pub fn write_results_csv(path: &Path, predictions: &[PredictedSample]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("create {}", path.display()))?;
    writer.write_record(["patient_id", "actual", "predicted", "synthetic"])?;
    for prediction in predictions {
        writer.serialize(prediction)?;
    }
    writer
        .flush()
        .with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), rows = predictions.len(), "results written");
    Ok(())
}

pub fn write_report_json(path: &Path, run: &EvaluationRun) -> Result<()> {
    let payload = ReportPayload {
        schema: REPORT_SCHEMA,
        schema_version: REPORT_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        source: run.source.display().to_string(),
        options: &run.options,
        diagnosis_column: &run.diagnosis_column,
        counts: &run.counts,
        target_count: run.target_count,
        unrecognized: run.unrecognized.len(),
        blank_diagnosis: run.blank_diagnosis,
        excluded_missing: run.excluded_missing,
        evaluated: run.evaluation.evaluated(),
        skipped: run.evaluation.skipped,
        metrics: &run.evaluation.metrics,
        confusion_matrix: &run.evaluation.matrix,
        class_metrics: &run.class_metrics,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(path, format!("{json}\n"))
        .with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), "report written");
    Ok(())
}
