//! Error types for patient data ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading and labelling a dataset.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File Errors ===
    /// Input file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Extension is neither CSV nor XLSX.
    #[error("unsupported file format for {path}: expected a .csv or .xlsx file")]
    UnsupportedFormat { path: PathBuf },

    /// File parsed but holds no data rows.
    #[error("file is empty: {path}")]
    EmptyFile { path: PathBuf },

    // === Parsing Errors ===
    /// CSV decoding failed.
    #[error("failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Workbook decoding failed.
    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    /// Workbook contains no worksheets.
    #[error("workbook has no worksheets: {path}")]
    NoWorksheet { path: PathBuf },

    // === Validation Errors ===
    /// No header matches any accepted diagnosis column name.
    #[error(
        "diagnosis column not found; expected one of: {expected}; columns found: {}",
        .found.join(", ")
    )]
    DiagnosisColumnNotFound { expected: String, found: Vec<String> },

    /// A diagnosis value outside the known classes under the reject policy.
    #[error("unrecognized diagnosis '{value}' in data row {row}")]
    UnrecognizedDiagnosis { row: usize, value: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
