//! CLI argument definitions for febrile-dx.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use febrile_model::{LabelPolicy, MissingFeaturePolicy, ModelKind};

#[derive(Parser)]
#[command(
    name = "febrile-dx",
    version,
    about = "Febrile disease pseudo-diagnosis - Dengue, Malaria, Leptospirosis",
    long_about = "Deterministic, rule-based pseudo-diagnosis of febrile tropical diseases.\n\n\
                  Balances a labelled CSV/XLSX dataset with synthetic samples, runs a\n\
                  logistic or neural rule table over it and reports a confusion matrix.\n\
                  No statistical model is trained; results are for demonstration only."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow patient values in trace logs (PHI).
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Balance, predict and evaluate a labelled patient file.
    Evaluate(EvaluateArgs),

    /// Predict the diagnosis of a single patient.
    Predict(PredictArgs),

    /// List class labels and recognized diagnosis column names.
    Labels,
}

#[derive(Parser)]
pub struct EvaluateArgs {
    /// Patient data file (.csv or .xlsx) with a diagnosis column.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Pseudo-predictor to run.
    #[arg(long = "model", value_enum, default_value = "logistic")]
    pub model: ModelArg,

    /// Evaluate real rows only, without synthetic oversampling.
    #[arg(long = "no-balance")]
    pub no_balance: bool,

    /// What to do with rows whose diagnosis is not a known class.
    #[arg(long = "label-policy", value_enum, default_value = "quarantine")]
    pub label_policy: LabelPolicyArg,

    /// What to do with rows lacking platelets, temperature or hemoglobin.
    #[arg(long = "missing-features", value_enum, default_value = "default-zero")]
    pub missing_features: MissingFeaturesArg,

    /// Output directory for the results CSV (default: the input file's directory).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also write a JSON report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Number of per-patient rows shown in the summary.
    #[arg(long = "preview", value_name = "ROWS", default_value_t = 20)]
    pub preview: usize,

    /// Evaluate and report without writing output files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct PredictArgs {
    /// Pseudo-predictor to run.
    #[arg(long = "model", value_enum, default_value = "logistic")]
    pub model: ModelArg,

    /// JSON object with the patient's fields.
    #[arg(long = "input", value_name = "JSON_FILE")]
    pub input: Option<PathBuf>,

    /// Patient field as KEY=VALUE; repeatable and applied after --input.
    #[arg(long = "field", short = 'f', value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Print the prediction as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty field name in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModelArg {
    Logistic,
    Neural,
}

impl From<ModelArg> for ModelKind {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Logistic => ModelKind::Logistic,
            ModelArg::Neural => ModelKind::Neural,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LabelPolicyArg {
    /// Skip and list unrecognized rows.
    Quarantine,
    /// Fail on the first unrecognized row.
    Reject,
}

impl From<LabelPolicyArg> for LabelPolicy {
    fn from(arg: LabelPolicyArg) -> Self {
        match arg {
            LabelPolicyArg::Quarantine => LabelPolicy::Quarantine,
            LabelPolicyArg::Reject => LabelPolicy::Reject,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MissingFeaturesArg {
    /// Score missing lab values as zero.
    DefaultZero,
    /// Drop rows before balancing.
    Exclude,
}

impl From<MissingFeaturesArg> for MissingFeaturePolicy {
    fn from(arg: MissingFeaturesArg) -> Self {
        match arg {
            MissingFeaturesArg::DefaultZero => MissingFeaturePolicy::DefaultZero,
            MissingFeaturesArg::Exclude => MissingFeaturePolicy::Exclude,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
