//! Integration tests for the pipeline module.

use std::fs;
use std::path::{Path, PathBuf};

use febrile_cli::pipeline::{
    OutputConfig, apply_feature_policy, balance, evaluate, ingest, output, predict,
    results_file_name,
};
use febrile_cli::types::{EvaluationRun, OutputPaths, PredictedSample};
use febrile_ingest::IngestError;
use febrile_model::{ClassLabel, EvaluationOptions, LabelPolicy, MissingFeaturePolicy, ModelKind};
use febrile_predict::predictor_for;
use tempfile::TempDir;

const PATIENTS: &str = "\
Edad,Plaquetas,Temperatura,Hemoglobina,Fiebre,Dolor_Cabeza,Diagnostico
34,85,39.2,13.5,Sí,Sí,Dengue
28,70,38.6,14.1,Sí,Sí,1
45,160,39.8,10.9,Sí,No,Malaria
52,180,40.1,11.2,Sí,No,2
19,210,39.5,11.8,Sí,Sí,malaria vivax
61,140,38.9,12.4,No,Sí,Leptospirosis
23,,38.7,,Sí,Sí,3
40,150,37.2,14.0,No,No,Zika
";

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn run_pipeline(path: &Path, options: EvaluationOptions) -> EvaluationRun {
    let ingested = ingest(path, options.label_policy).unwrap();
    let features = apply_feature_policy(ingested.grouped.by_class, options.missing_features);
    let outcome = balance(&features.by_class, options.balance).unwrap();
    let predictor = predictor_for(options.model);
    let predictions = predict(&outcome.samples, predictor.as_ref());
    let (evaluation, class_metrics) = evaluate(&predictions);
    EvaluationRun {
        source: path.to_path_buf(),
        options,
        diagnosis_column: ingested.diagnosis_column,
        counts: outcome.counts,
        target_count: outcome.target_count,
        unrecognized: ingested.grouped.unrecognized,
        blank_diagnosis: ingested.grouped.blank_diagnosis,
        excluded_missing: features.excluded,
        predictions,
        evaluation,
        class_metrics,
        outputs: OutputPaths::default(),
    }
}

#[test]
fn missing_diagnosis_column_fails_at_ingest() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "sin_diagnostico.csv", "Edad,Plaquetas\n30,120\n");
    let err = ingest(&path, LabelPolicy::Quarantine).unwrap_err();
    let ingest_error = err.downcast_ref::<IngestError>().expect("ingest error");
    assert!(matches!(
        ingest_error,
        IngestError::DiagnosisColumnNotFound { found, .. } if found == &["Edad", "Plaquetas"]
    ));
    assert!(err.to_string().contains("diagnosis column not found"));
}

#[test]
fn rejected_label_stops_the_run() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacientes.csv", PATIENTS);
    let err = ingest(&path, LabelPolicy::Reject).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IngestError>(),
        Some(IngestError::UnrecognizedDiagnosis { row: 8, .. })
    ));
}

#[test]
fn balanced_run_evaluates_every_sample() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacientes.csv", PATIENTS);
    let run = run_pipeline(&path, EvaluationOptions::new(ModelKind::Neural));

    assert_eq!(run.diagnosis_column, "Diagnostico");
    assert_eq!(run.unrecognized.len(), 1);
    assert_eq!(run.unrecognized[0].value, "Zika");
    assert_eq!(run.target_count, 3);
    for label in ClassLabel::ALL {
        assert_eq!(run.counts.get(label).total(), 3);
    }
    assert_eq!(run.predictions.len(), 9);
    assert_eq!(run.evaluation.evaluated(), 9);
    assert_eq!(run.evaluation.skipped, 0);
    let ids: Vec<usize> = run.predictions.iter().map(|p| p.patient_id).collect();
    assert_eq!(ids, (1..=9).collect::<Vec<_>>());
    assert_eq!(run.predictions.iter().filter(|p| p.synthetic).count(), 2);
    let correct = run.predictions.iter().filter(|p| p.is_correct()).count() as u64;
    assert_eq!(correct, run.evaluation.matrix.trace());
}

#[test]
fn exclude_policy_drops_incomplete_rows() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacientes.csv", PATIENTS);
    let options = EvaluationOptions::new(ModelKind::Logistic)
        .with_balance(false)
        .with_missing_features(MissingFeaturePolicy::Exclude);
    let run = run_pipeline(&path, options);
    assert_eq!(run.excluded_missing, 1);
    assert_eq!(run.counts.get(ClassLabel::Leptospirosis).original, 1);
    assert_eq!(run.counts.total_synthetic(), 0);
    assert_eq!(run.predictions.len(), 6);
}

#[test]
fn output_writes_results_and_report() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacientes.csv", PATIENTS);
    let run = run_pipeline(&path, EvaluationOptions::default());
    let config = OutputConfig {
        output_dir: dir.path().join("out"),
        report: Some(dir.path().join("out").join("report.json")),
        dry_run: false,
    };
    let paths = output(&config, &run).unwrap();

    let results = paths.results_csv.expect("results path");
    assert_eq!(results, dir.path().join("out").join("pacientes_results.csv"));
    let contents = fs::read_to_string(&results).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("patient_id,actual,predicted,synthetic"));
    assert_eq!(lines.count(), run.predictions.len());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(paths.report.unwrap()).unwrap()).unwrap();
    assert_eq!(report["schema"], "febrile-dx.evaluation-report");
    assert_eq!(report["options"]["model"], "logistic");
    assert_eq!(report["evaluated"], 9);
    assert_eq!(report["confusion_matrix"].as_array().unwrap().len(), 3);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "pacientes.csv", PATIENTS);
    let run = run_pipeline(&path, EvaluationOptions::default());
    let config = OutputConfig {
        output_dir: dir.path().join("out"),
        report: None,
        dry_run: true,
    };
    let paths = output(&config, &run).unwrap();
    assert!(paths.results_csv.is_none());
    assert!(!dir.path().join("out").exists());
}

#[test]
fn results_file_name_uses_stem() {
    assert_eq!(
        results_file_name(Path::new("data/casos_2024.xlsx")),
        "casos_2024_results.csv"
    );
}

#[test]
fn predicted_sample_serialization() {
    let sample = PredictedSample {
        patient_id: 4,
        actual: ClassLabel::Malaria,
        predicted: ClassLabel::Dengue,
        synthetic: true,
    };
    insta::assert_json_snapshot!(sample, @r#"
    {
      "patient_id": 4,
      "actual": "Malaria",
      "predicted": "Dengue",
      "synthetic": true
    }
    "#);
}
