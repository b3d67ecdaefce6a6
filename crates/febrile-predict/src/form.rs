//! Field requirements of a hand-entered patient record.

use std::fmt;

use serde::Serialize;

use febrile_model::record::format_number;
use febrile_model::{CellValue, Record};

use crate::error::{PredictError, Result};

/// Accepted symptom answers, compared case-insensitively.
const FLAG_TOKENS: [&str; 8] = ["sí", "si", "no", "yes", "true", "false", "1", "0"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    /// Inclusive numeric range.
    Number { min: f64, max: f64 },
    /// Sí/no symptom answer.
    Flag,
}

/// One required form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Column name as it appears in the clinical dataset.
    pub name: &'static str,
    /// Alternative column names, matched case-insensitively like `name`.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn number(
        name: &'static str,
        aliases: &'static [&'static str],
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            name,
            aliases,
            kind: FieldKind::Number { min, max },
        }
    }

    const fn flag(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            kind: FieldKind::Flag,
        }
    }

    fn lookup<'a>(&self, record: &'a Record) -> Option<&'a CellValue> {
        std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .filter_map(|key| record.get_ignore_case(key))
            .find(|value| !value.is_empty())
    }

    fn check(&self, record: &Record) -> Option<FieldIssue> {
        let field = self.name.to_string();
        let Some(value) = self.lookup(record) else {
            return Some(FieldIssue::Missing { field });
        };
        match self.kind {
            FieldKind::Number { min, max } => match value.as_f64() {
                None => Some(FieldIssue::NotANumber {
                    field,
                    value: value.to_string(),
                }),
                Some(number) if number < min || number > max => Some(FieldIssue::OutOfRange {
                    field,
                    value: number,
                    min,
                    max,
                }),
                Some(_) => None,
            },
            FieldKind::Flag => {
                let text = value.as_text().trim().to_lowercase();
                if FLAG_TOKENS.contains(&text.as_str()) {
                    None
                } else {
                    Some(FieldIssue::NotAFlag {
                        field,
                        value: value.to_string(),
                    })
                }
            }
        }
    }
}

/// Fields the single-record path requires, in display order.
pub const PATIENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::number("Edad", &["age"], 0.0, 110.0),
    FieldSpec::number("Dias_Hospitalizacion", &["hospitalization_days"], 0.0, 120.0),
    FieldSpec::number("Temperatura", &["body_temperature", "temperature"], 30.0, 45.0),
    FieldSpec::flag("Fiebre", &["fever"]),
    FieldSpec::flag("Dolor_Cabeza", &["dolorcabeza", "headache"]),
    FieldSpec::flag("Nauseas", &["náuseas", "nausea"]),
    FieldSpec::flag("Escalofrios", &["chills"]),
    FieldSpec::flag("Dolor_Muscular", &["myalgias"]),
    FieldSpec::flag("Erupcion_Cutanea", &["rash"]),
    FieldSpec::flag("Ictericia", &["jaundice"]),
    FieldSpec::number("Plaquetas", &["platelets"], 0.0, 1500.0),
    FieldSpec::number("Hemoglobina", &["hemoglobin"], 0.0, 25.0),
    FieldSpec::number("Leucocitos", &["white_blood_cells"], 0.0, 200.0),
    FieldSpec::number("Hematocrito", &["hematocrit"], 0.0, 70.0),
    FieldSpec::number("Creatinina", &["creatinine"], 0.0, 20.0),
    FieldSpec::number("TGO_AST", &["ast"], 0.0, 2000.0),
    FieldSpec::number("TGP_ALT", &["alt"], 0.0, 2000.0),
];

/// A problem with one form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FieldIssue {
    Missing {
        field: String,
    },
    NotANumber {
        field: String,
        value: String,
    },
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
    NotAFlag {
        field: String,
        value: String,
    },
}

impl FieldIssue {
    pub fn field(&self) -> &str {
        match self {
            FieldIssue::Missing { field }
            | FieldIssue::NotANumber { field, .. }
            | FieldIssue::OutOfRange { field, .. }
            | FieldIssue::NotAFlag { field, .. } => field,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Missing { field } => write!(f, "{field} is required"),
            FieldIssue::NotANumber { field, value } => {
                write!(f, "{field} must be a number (got '{value}')")
            }
            FieldIssue::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(
                f,
                "{field} must be between {} and {} (got {})",
                format_number(*min),
                format_number(*max),
                format_number(*value)
            ),
            FieldIssue::NotAFlag { field, value } => {
                write!(f, "{field} must be Sí or No (got '{value}')")
            }
        }
    }
}

/// Validator for hand-entered patient records.
#[derive(Debug, Clone, Copy)]
pub struct PatientForm {
    fields: &'static [FieldSpec],
}

impl Default for PatientForm {
    fn default() -> Self {
        Self {
            fields: PATIENT_FIELDS,
        }
    }
}

impl PatientForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every missing, malformed or out-of-range field, in form order.
    pub fn issues(&self, record: &Record) -> Vec<FieldIssue> {
        self.fields
            .iter()
            .filter_map(|spec| spec.check(record))
            .collect()
    }

    pub fn validate(&self, record: &Record) -> Result<()> {
        let issues = self.issues(record);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(PredictError::InvalidFields { issues })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_shows_bounds() {
        let issue = FieldIssue::OutOfRange {
            field: "Temperatura".to_string(),
            value: 47.5,
            min: 30.0,
            max: 45.0,
        };
        assert_eq!(
            issue.to_string(),
            "Temperatura must be between 30 and 45 (got 47.5)"
        );
    }

    #[test]
    fn english_aliases_satisfy_fields() {
        let spec = FieldSpec::number("Plaquetas", &["platelets"], 0.0, 1500.0);
        let record = Record::from_pairs([("PLATELETS", "200")]);
        assert_eq!(spec.check(&record), None);
    }

    #[test]
    fn flags_accept_numeric_answers() {
        let spec = FieldSpec::flag("Fiebre", &["fever"]);
        assert_eq!(spec.check(&Record::from_pairs([("fever", CellValue::Number(1.0))])), None);
        assert_eq!(
            spec.check(&Record::from_pairs([("Fiebre", "quizás")])),
            Some(FieldIssue::NotAFlag {
                field: "Fiebre".to_string(),
                value: "quizás".to_string(),
            })
        );
    }
}
