//! Error types for single-record prediction.

use thiserror::Error;

use crate::form::FieldIssue;

/// Number of field issues spelled out in an error message.
const SHOWN_ISSUES: usize = 10;

#[derive(Debug, Error)]
pub enum PredictError {
    /// One or more patient fields are missing or out of range.
    #[error("invalid patient data: {}", summarize(.issues))]
    InvalidFields { issues: Vec<FieldIssue> },
}

/// Result type for prediction operations.
pub type Result<T> = std::result::Result<T, PredictError>;

fn summarize(issues: &[FieldIssue]) -> String {
    let mut message = issues
        .iter()
        .take(SHOWN_ISSUES)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if issues.len() > SHOWN_ISSUES {
        message.push_str(&format!("; ... and {} more", issues.len() - SHOWN_ISSUES));
    }
    message
}
