//! Numeric vs categorical column detection.

use febrile_model::{CellValue, Record};

/// Number of leading samples inspected per column.
pub const CLASSIFY_SAMPLE_SIZE: usize = 3;

/// Tokens that always mark a value as categorical, compared case-insensitively.
pub const CATEGORICAL_TOKENS: [&str; 5] = ["sí", "si", "no", "true", "false"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Column kinds in the column order of the first sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnKinds {
    columns: Vec<(String, ColumnKind)>,
}

impl ColumnKinds {
    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| *kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn numeric(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, kind)| *kind == ColumnKind::Numeric)
            .map(|(name, _)| name)
    }

    pub fn categorical(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, kind)| *kind == ColumnKind::Categorical)
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// True when `value` counts as numeric for synthesis.
///
/// Blank cells and yes/no style tokens are categorical even though some of
/// them could be coerced to numbers.
pub fn is_numeric_value(value: &CellValue) -> bool {
    match value {
        CellValue::Empty => false,
        CellValue::Number(number) => number.is_finite(),
        CellValue::Text(text) => {
            let lower = text.trim().to_lowercase();
            if lower.is_empty() || CATEGORICAL_TOKENS.contains(&lower.as_str()) {
                return false;
            }
            value.as_f64().is_some()
        }
    }
}

/// Classifies every column of the first sample by looking at up to
/// [`CLASSIFY_SAMPLE_SIZE`] samples. A column is numeric only when every
/// inspected value is numeric; a column absent from a later sample is
/// categorical.
pub fn classify_columns(samples: &[Record]) -> ColumnKinds {
    let Some(first) = samples.first() else {
        return ColumnKinds::default();
    };
    let probe = &samples[..samples.len().min(CLASSIFY_SAMPLE_SIZE)];
    let columns = first
        .keys()
        .map(|column| {
            let numeric = probe
                .iter()
                .all(|sample| sample.get(column).is_some_and(is_numeric_value));
            let kind = if numeric {
                ColumnKind::Numeric
            } else {
                ColumnKind::Categorical
            };
            (column.to_string(), kind)
        })
        .collect();
    ColumnKinds { columns }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        Record::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn yes_no_tokens_are_categorical() {
        for token in ["Sí", "SI", "no", "True", "false", "  "] {
            assert!(!is_numeric_value(&CellValue::from_text(token)), "{token}");
        }
        assert!(is_numeric_value(&CellValue::from_text("38.5")));
        assert!(is_numeric_value(&CellValue::Number(0.0)));
        assert!(!is_numeric_value(&CellValue::from_text("Rural")));
    }

    #[test]
    fn classifies_by_first_three_samples() {
        let samples = vec![
            record(&[("Edad", "25"), ("Fiebre", "Sí"), ("Hb", "12.1")]),
            record(&[("Edad", "31"), ("Fiebre", "No"), ("Hb", "")]),
            record(&[("Edad", "44"), ("Fiebre", "Sí"), ("Hb", "11")]),
            // Beyond the probe window; does not demote Edad.
            record(&[("Edad", "desconocida"), ("Fiebre", "Sí"), ("Hb", "13")]),
        ];
        let kinds = classify_columns(&samples);
        assert_eq!(kinds.kind("Edad"), Some(ColumnKind::Numeric));
        assert_eq!(kinds.kind("Fiebre"), Some(ColumnKind::Categorical));
        assert_eq!(kinds.kind("Hb"), Some(ColumnKind::Categorical));
        assert_eq!(kinds.numeric().collect::<Vec<_>>(), vec!["Edad"]);
        assert_eq!(kinds.categorical().collect::<Vec<_>>(), vec!["Fiebre", "Hb"]);
    }

    #[test]
    fn column_missing_from_later_sample_is_categorical() {
        let samples = vec![record(&[("A", "1"), ("B", "2")]), record(&[("A", "3")])];
        let kinds = classify_columns(&samples);
        assert_eq!(kinds.kind("A"), Some(ColumnKind::Numeric));
        assert_eq!(kinds.kind("B"), Some(ColumnKind::Categorical));
    }

    #[test]
    fn empty_input_has_no_columns() {
        assert!(classify_columns(&[]).is_empty());
    }
}
