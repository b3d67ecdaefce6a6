//! Diagnosis column detection and value normalization.

use tracing::warn;

use febrile_model::{CellValue, ClassLabel, Diagnosis};

use crate::error::{IngestError, Result};

/// Accepted diagnosis column headers, compared after trimming and lowercasing.
pub const DIAGNOSIS_COLUMN_NAMES: [&str; 6] = [
    "diagnostico",
    "diagnóstico",
    "diagnosis",
    "clase",
    "class",
    "label",
];

/// Returns the header holding the actual diagnosis.
///
/// When more than one header matches, the first one wins.
pub fn find_diagnosis_column(headers: &[String]) -> Result<String> {
    let mut matches = headers.iter().filter(|header| {
        let lower = header.trim().to_lowercase();
        DIAGNOSIS_COLUMN_NAMES.contains(&lower.as_str())
    });
    let Some(column) = matches.next() else {
        return Err(IngestError::DiagnosisColumnNotFound {
            expected: DIAGNOSIS_COLUMN_NAMES.join(", "),
            found: headers.to_vec(),
        });
    };
    let ignored: Vec<&String> = matches.collect();
    if !ignored.is_empty() {
        warn!(
            column = %column,
            ignored = ?ignored,
            "multiple diagnosis columns found; using the first"
        );
    }
    Ok(column.clone())
}

/// Numeric diagnosis codes, matched exactly after trimming.
pub const DIAGNOSIS_CODES: [(&str, ClassLabel); 4] = [
    ("0", ClassLabel::Dengue),
    ("1", ClassLabel::Dengue),
    ("2", ClassLabel::Malaria),
    ("3", ClassLabel::Leptospirosis),
];

/// Disease name fragments, matched as lowercase substrings in this order.
pub const DIAGNOSIS_KEYWORDS: [(&str, ClassLabel); 3] = [
    ("dengue", ClassLabel::Dengue),
    ("malaria", ClassLabel::Malaria),
    ("leptospir", ClassLabel::Leptospirosis),
];

/// Maps a raw diagnosis cell to a [`Diagnosis`].
///
/// Numeric codes `0`/`1` are Dengue, `2` Malaria, `3` Leptospirosis. Otherwise
/// a case-insensitive substring match on the disease name is tried. Anything
/// else is kept verbatim as [`Diagnosis::Unrecognized`]. Blank cells yield
/// `None`.
pub fn normalize_diagnosis(value: &CellValue) -> Option<Diagnosis> {
    if value.is_empty() {
        return None;
    }
    let text = value.as_text();
    let trimmed = text.trim();
    if let Some((_, label)) = DIAGNOSIS_CODES.iter().find(|(code, _)| *code == trimmed) {
        return Some(Diagnosis::Known(*label));
    }
    let lower = trimmed.to_lowercase();
    let keyword = DIAGNOSIS_KEYWORDS
        .iter()
        .find(|(fragment, _)| lower.contains(fragment));
    Some(match keyword {
        Some((_, label)) => Diagnosis::Known(*label),
        None => Diagnosis::Unrecognized(trimmed.to_string()),
    })
}
