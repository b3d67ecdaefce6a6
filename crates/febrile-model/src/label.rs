//! The closed set of diagnoses the pipeline can emit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three febrile diseases the pseudo-predictors distinguish.
///
/// The declaration order is the confusion-matrix index order and must not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassLabel {
    Dengue,
    Malaria,
    Leptospirosis,
}

impl ClassLabel {
    /// All labels in confusion-matrix order.
    pub const ALL: [ClassLabel; 3] = [
        ClassLabel::Dengue,
        ClassLabel::Malaria,
        ClassLabel::Leptospirosis,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            ClassLabel::Dengue => 0,
            ClassLabel::Malaria => 1,
            ClassLabel::Leptospirosis => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassLabel::Dengue => "Dengue",
            ClassLabel::Malaria => "Malaria",
            ClassLabel::Leptospirosis => "Leptospirosis",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized diagnosis value.
///
/// Values that match none of the known encodings keep their raw text so
/// callers decide whether to quarantine or reject them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diagnosis {
    Known(ClassLabel),
    Unrecognized(String),
}

impl Diagnosis {
    pub fn label(&self) -> Option<ClassLabel> {
        match self {
            Diagnosis::Known(label) => Some(*label),
            Diagnosis::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Diagnosis::Known(label) => label.as_str(),
            Diagnosis::Unrecognized(raw) => raw,
        }
    }
}

impl From<ClassLabel> for Diagnosis {
    fn from(label: ClassLabel) -> Self {
        Diagnosis::Known(label)
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_all() {
        for (idx, label) in ClassLabel::ALL.iter().enumerate() {
            assert_eq!(label.index(), idx);
            assert_eq!(ClassLabel::from_index(idx), Some(*label));
        }
        assert_eq!(ClassLabel::from_index(3), None);
    }

    #[test]
    fn unrecognized_diagnosis_has_no_label() {
        let diagnosis = Diagnosis::Unrecognized("Zika".to_string());
        assert_eq!(diagnosis.label(), None);
        assert_eq!(diagnosis.to_string(), "Zika");
    }
}
