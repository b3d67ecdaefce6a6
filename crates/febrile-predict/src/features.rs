//! Clinical feature extraction from loosely named columns.

use std::fmt;

use febrile_model::{CellValue, Record};

const PLATELETS: &[&str] = &["plaquetas", "platelets"];
const TEMPERATURE: &[&str] = &["temperatura", "body_temperature", "temperature"];
const HEMOGLOBIN: &[&str] = &["hemoglobina", "hemoglobin"];
const AGE: &[&str] = &["edad", "age"];
const FEVER: &[&str] = &["fiebre", "fever"];
const HEADACHE: &[&str] = &["dolor_cabeza", "dolorcabeza", "headache"];
const NAUSEA: &[&str] = &["nauseas", "náuseas", "nausea"];

/// Tokens read as "yes", compared case-insensitively.
const AFFIRMATIVE: [&str; 5] = ["sí", "si", "yes", "true", "1"];

/// Lab values the rule tables cannot do without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreFeature {
    Platelets,
    Temperature,
    Hemoglobin,
}

impl CoreFeature {
    pub const ALL: [CoreFeature; 3] = [
        CoreFeature::Platelets,
        CoreFeature::Temperature,
        CoreFeature::Hemoglobin,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CoreFeature::Platelets => "platelets",
            CoreFeature::Temperature => "temperature",
            CoreFeature::Hemoglobin => "hemoglobin",
        }
    }
}

impl fmt::Display for CoreFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features the rule tables read from a record.
///
/// Numeric features are `None` when the column is absent, blank or not a
/// number; the rules then treat them as `0`. Symptom flags default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClinicalFeatures {
    pub platelets: Option<f64>,
    pub temperature: Option<f64>,
    pub hemoglobin: Option<f64>,
    pub age: Option<f64>,
    pub fever: bool,
    pub headache: bool,
    pub nausea: bool,
}

impl ClinicalFeatures {
    /// Reads features using Spanish and English column aliases, ignoring case.
    pub fn from_record(record: &Record) -> Self {
        Self {
            platelets: number(record, PLATELETS),
            temperature: number(record, TEMPERATURE),
            hemoglobin: number(record, HEMOGLOBIN),
            age: number(record, AGE),
            fever: flag(record, FEVER),
            headache: flag(record, HEADACHE),
            nausea: flag(record, NAUSEA),
        }
    }

    pub fn platelets(&self) -> f64 {
        self.platelets.unwrap_or(0.0)
    }

    pub fn temperature(&self) -> f64 {
        self.temperature.unwrap_or(0.0)
    }

    pub fn hemoglobin(&self) -> f64 {
        self.hemoglobin.unwrap_or(0.0)
    }

    pub fn age(&self) -> f64 {
        self.age.unwrap_or(0.0)
    }

    /// Core lab values that could not be read.
    pub fn missing_core(&self) -> Vec<CoreFeature> {
        CoreFeature::ALL
            .into_iter()
            .filter(|feature| match feature {
                CoreFeature::Platelets => self.platelets.is_none(),
                CoreFeature::Temperature => self.temperature.is_none(),
                CoreFeature::Hemoglobin => self.hemoglobin.is_none(),
            })
            .collect()
    }
}

/// True for sí/si/yes/true/1 (any case) or a non-zero number.
pub fn is_affirmative(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => false,
        CellValue::Number(number) => *number != 0.0,
        CellValue::Text(text) => {
            let lower = text.trim().to_lowercase();
            AFFIRMATIVE.contains(&lower.as_str()) || value.as_f64().is_some_and(|n| n != 0.0)
        }
    }
}

fn lookup<'a>(record: &'a Record, aliases: &[&str]) -> Option<&'a CellValue> {
    aliases
        .iter()
        .filter_map(|alias| record.get_ignore_case(alias))
        .find(|value| !value.is_empty())
}

fn number(record: &Record, aliases: &[&str]) -> Option<f64> {
    lookup(record, aliases).and_then(CellValue::as_f64)
}

fn flag(record: &Record, aliases: &[&str]) -> bool {
    lookup(record, aliases).is_some_and(is_affirmative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spanish_and_english_aliases() {
        let spanish = Record::from_pairs([
            ("PLAQUETAS", "85"),
            ("Temperatura", "39.2"),
            ("Dolor_Cabeza", "Sí"),
            ("Fiebre", "si"),
            ("Náuseas", "No"),
        ]);
        let features = ClinicalFeatures::from_record(&spanish);
        assert_eq!(features.platelets, Some(85.0));
        assert_eq!(features.temperature, Some(39.2));
        assert!(features.fever && features.headache && !features.nausea);

        let english = Record::from_pairs([
            ("platelets", CellValue::Number(120.0)),
            ("body_temperature", CellValue::Number(38.0)),
            ("headache", CellValue::Number(1.0)),
            ("fever", CellValue::Number(0.0)),
        ]);
        let features = ClinicalFeatures::from_record(&english);
        assert_eq!(features.platelets(), 120.0);
        assert!(features.headache);
        assert!(!features.fever);
    }

    #[test]
    fn unreadable_values_default_to_zero() {
        let record = Record::from_pairs([("Plaquetas", "n/a"), ("Hemoglobina", "")]);
        let features = ClinicalFeatures::from_record(&record);
        assert_eq!(features.platelets, None);
        assert_eq!(features.platelets(), 0.0);
        assert_eq!(features.age(), 0.0);
        assert_eq!(
            features.missing_core(),
            vec![
                CoreFeature::Platelets,
                CoreFeature::Temperature,
                CoreFeature::Hemoglobin
            ]
        );
    }

    #[test]
    fn affirmative_tokens() {
        for yes in ["Sí", "SI", "yes", "True", "1", "2"] {
            assert!(is_affirmative(&CellValue::from(yes)), "{yes}");
        }
        for no in ["No", "false", "0", "", "maybe"] {
            assert!(!is_affirmative(&CellValue::from(no)), "{no}");
        }
    }
}
