use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::{info, info_span};

use febrile_cli::pipeline::{
    IngestResult, OutputConfig, apply_feature_policy, balance, evaluate, ingest, output, predict,
};
use febrile_cli::types::{EvaluationRun, OutputPaths};
use febrile_ingest::{DIAGNOSIS_CODES, DIAGNOSIS_COLUMN_NAMES, DIAGNOSIS_KEYWORDS};
use febrile_model::{CellValue, ClassLabel, EvaluationOptions, Record};
use febrile_predict::{PatientForm, Prediction, predictor_for};

use crate::cli::{EvaluateArgs, PredictArgs};
use crate::summary::apply_table_style;

pub fn run_labels() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Index", "Class", "Codes", "Keyword"]);
    apply_table_style(&mut table);
    for label in ClassLabel::ALL {
        let codes: Vec<&str> = DIAGNOSIS_CODES
            .iter()
            .filter(|(_, coded)| *coded == label)
            .map(|(code, _)| *code)
            .collect();
        let keyword = DIAGNOSIS_KEYWORDS
            .iter()
            .find(|(_, matched)| *matched == label)
            .map(|(fragment, _)| *fragment)
            .unwrap_or("-");
        table.add_row(vec![
            label.index().to_string(),
            label.to_string(),
            codes.join(", "),
            keyword.to_string(),
        ]);
    }
    println!("{table}");
    println!("Diagnosis columns: {}", DIAGNOSIS_COLUMN_NAMES.join(", "));
    Ok(())
}

pub fn run_evaluate(args: &EvaluateArgs) -> Result<EvaluationRun> {
    let options = EvaluationOptions::new(args.model.into())
        .with_balance(!args.no_balance)
        .with_label_policy(args.label_policy.into())
        .with_missing_features(args.missing_features.into())
        .with_preview_rows(args.preview);
    let source = &args.file;
    let run_span = info_span!(
        "evaluate_file",
        source = %source.display(),
        model = %options.model
    );
    let _run_guard = run_span.enter();

    // =========================================================================
    // Stage 1: Ingest
    // =========================================================================
    let ingest_start = Instant::now();
    let IngestResult {
        row_count,
        diagnosis_column,
        grouped,
    } = info_span!("ingest")
        .in_scope(|| ingest(source, options.label_policy))
        .with_context(|| format!("ingest {}", source.display()))?;
    info!(
        rows = row_count,
        diagnosis_column = %diagnosis_column,
        labelled = grouped.total(),
        unrecognized = grouped.unrecognized.len(),
        blank_diagnosis = grouped.blank_diagnosis,
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    // =========================================================================
    // Stage 2-3: Missing features, Balance
    // =========================================================================
    let balance_start = Instant::now();
    let (features, outcome) = info_span!("balance", enabled = options.balance).in_scope(
        || -> Result<_> {
            let features = apply_feature_policy(grouped.by_class, options.missing_features);
            let outcome = balance(&features.by_class, options.balance)?;
            Ok((features, outcome))
        },
    )?;
    info!(
        target_count = outcome.target_count,
        real = outcome.counts.total_original(),
        synthetic = outcome.counts.total_synthetic(),
        excluded = features.excluded,
        duration_ms = balance_start.elapsed().as_millis(),
        "balance complete"
    );

    // =========================================================================
    // Stage 4: Predict
    // =========================================================================
    let predict_start = Instant::now();
    let predictor = predictor_for(options.model);
    let predictions = info_span!("predict", model = %options.model)
        .in_scope(|| predict(&outcome.samples, predictor.as_ref()));
    info!(
        samples = predictions.len(),
        duration_ms = predict_start.elapsed().as_millis(),
        "predict complete"
    );

    // =========================================================================
    // Stage 5: Evaluate
    // =========================================================================
    let evaluate_start = Instant::now();
    let (evaluation, class_metrics) = info_span!("evaluate").in_scope(|| evaluate(&predictions));
    info!(
        evaluated = evaluation.evaluated(),
        skipped = evaluation.skipped,
        accuracy = evaluation.metrics.accuracy,
        duration_ms = evaluate_start.elapsed().as_millis(),
        "evaluate complete"
    );

    let mut run = EvaluationRun {
        source: source.clone(),
        options,
        diagnosis_column,
        counts: outcome.counts,
        target_count: outcome.target_count,
        unrecognized: grouped.unrecognized,
        blank_diagnosis: grouped.blank_diagnosis,
        excluded_missing: features.excluded,
        predictions,
        evaluation,
        class_metrics,
        outputs: OutputPaths::default(),
    };

    // =========================================================================
    // Stage 6: Output
    // =========================================================================
    let output_start = Instant::now();
    let config = OutputConfig {
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(source)),
        report: args.report.clone(),
        dry_run: args.dry_run,
    };
    let outputs =
        info_span!("output", dry_run = config.dry_run).in_scope(|| output(&config, &run))?;
    run.outputs = outputs;
    info!(
        results_csv = run.outputs.results_csv.is_some(),
        report = run.outputs.report.is_some(),
        duration_ms = output_start.elapsed().as_millis(),
        "output complete"
    );
    Ok(run)
}

pub fn run_predict(args: &PredictArgs) -> Result<Prediction> {
    let mut record = match &args.input {
        Some(path) => read_patient_json(path)?,
        None => Record::new(),
    };
    for (key, value) in &args.fields {
        record.insert(key.clone(), CellValue::from(value.as_str()));
    }
    PatientForm::new().validate(&record)?;
    let predictor = predictor_for(args.model.into());
    let prediction = info_span!("predict", model = %predictor.kind())
        .in_scope(|| predictor.predict(&record));
    info!(
        label = %prediction.label,
        confidence = prediction.confidence,
        "prediction complete"
    );
    Ok(prediction)
}

fn read_patient_json(path: &Path) -> Result<Record> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse patient JSON {}", path.display()))
}

fn default_output_dir(source: &Path) -> PathBuf {
    match source.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
