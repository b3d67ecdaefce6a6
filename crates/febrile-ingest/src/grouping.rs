//! Grouping rows by normalized diagnosis.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use febrile_model::{ClassCounts, ClassLabel, Diagnosis, LabelPolicy, Record};

use crate::diagnosis::normalize_diagnosis;
use crate::error::{IngestError, Result};
use crate::reader::DataTable;

/// A row whose diagnosis matched none of the known classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedRow {
    /// 1-based data row number in the source file (header excluded, blank
    /// rows counted).
    pub row: usize,
    pub value: String,
}

/// Rows split by class, in file order within each class.
#[derive(Debug, Clone, Default)]
pub struct GroupedRecords {
    pub by_class: BTreeMap<ClassLabel, Vec<Record>>,
    pub unrecognized: Vec<UnrecognizedRow>,
    /// Rows with an empty diagnosis cell.
    pub blank_diagnosis: usize,
}

impl GroupedRecords {
    pub fn records(&self, label: ClassLabel) -> &[Record] {
        self.by_class.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn counts(&self) -> ClassCounts {
        let mut counts = ClassCounts::default();
        for label in ClassLabel::ALL {
            counts.get_mut(label).original = self.records(label).len();
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.by_class.values().map(Vec::len).sum()
    }
}

/// Splits `table` by the normalized value of `diagnosis_column`.
///
/// Under [`LabelPolicy::Reject`] the first unrecognized value fails the call;
/// under [`LabelPolicy::Quarantine`] such rows are collected separately.
pub fn group_by_diagnosis(
    table: &DataTable,
    diagnosis_column: &str,
    policy: LabelPolicy,
) -> Result<GroupedRecords> {
    let mut grouped = GroupedRecords::default();
    for label in ClassLabel::ALL {
        grouped.by_class.insert(label, Vec::new());
    }
    for (row, record) in table.rows() {
        let Some(diagnosis) = record.get(diagnosis_column).and_then(normalize_diagnosis) else {
            grouped.blank_diagnosis += 1;
            continue;
        };
        match diagnosis {
            Diagnosis::Known(label) => {
                grouped
                    .by_class
                    .entry(label)
                    .or_default()
                    .push(record.clone());
            }
            Diagnosis::Unrecognized(value) => match policy {
                LabelPolicy::Reject => {
                    return Err(IngestError::UnrecognizedDiagnosis { row, value });
                }
                LabelPolicy::Quarantine => {
                    grouped.unrecognized.push(UnrecognizedRow { row, value });
                }
            },
        }
    }
    if !grouped.unrecognized.is_empty() {
        warn!(
            count = grouped.unrecognized.len(),
            "rows with unrecognized diagnosis quarantined"
        );
    }
    debug!(
        dengue = grouped.records(ClassLabel::Dengue).len(),
        malaria = grouped.records(ClassLabel::Malaria).len(),
        leptospirosis = grouped.records(ClassLabel::Leptospirosis).len(),
        blank = grouped.blank_diagnosis,
        "rows grouped by diagnosis"
    );
    Ok(grouped)
}
