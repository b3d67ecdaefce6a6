//! Fixed clinical rule tables.

use febrile_model::ClassLabel;

use crate::features::ClinicalFeatures;

/// A class score must exceed this to win outright.
const SCORE_THRESHOLD: u32 = 50;

/// First matching rule of the logistic cascade, if any.
///
/// Dengue needs low platelets, fever above 38 °C, headache and fever;
/// malaria needs fever above 39 °C with hemoglobin under 12; leptospirosis
/// needs headache, fever above 38.5 °C and hemoglobin under 13.
pub fn logistic_rule(features: &ClinicalFeatures) -> Option<ClassLabel> {
    let plt = features.platelets();
    let temp = features.temperature();
    let hb = features.hemoglobin();
    if plt < 100.0 && temp > 38.0 && features.headache && features.fever {
        Some(ClassLabel::Dengue)
    } else if temp > 39.0 && hb < 12.0 && features.fever {
        Some(ClassLabel::Malaria)
    } else if features.headache && temp > 38.5 && hb < 13.0 {
        Some(ClassLabel::Leptospirosis)
    } else {
        None
    }
}

/// Additive evidence per class, indexed like [`ClassLabel::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassScores {
    scores: [u32; ClassLabel::COUNT],
}

impl ClassScores {
    pub fn from_features(features: &ClinicalFeatures) -> Self {
        let plt = features.platelets();
        let temp = features.temperature();
        let hb = features.hemoglobin();
        let age = features.age();
        let fever = features.fever;
        let headache = features.headache;

        let dengue = points(plt < 100.0, 30)
            + points(temp > 38.0, 25)
            + points(headache, 20)
            + points(fever, 15)
            + points(age > 15.0 && age < 60.0, 10);
        let malaria = points(temp > 39.0, 30)
            + points(hb < 12.0, 25)
            + points(fever, 20)
            + points(headache, 15);
        let leptospirosis = points(headache, 25)
            + points(temp > 38.5, 20)
            + points(fever, 15)
            + points(hb < 13.0, 15);

        Self {
            scores: [dengue, malaria, leptospirosis],
        }
    }

    pub fn get(&self, label: ClassLabel) -> u32 {
        self.scores[label.index()]
    }

    pub fn max(&self) -> u32 {
        self.scores.iter().copied().max().unwrap_or(0)
    }

    /// The first class in label order holding the maximum, when that maximum
    /// exceeds 50.
    pub fn winner(&self) -> Option<(ClassLabel, u32)> {
        let max = self.max();
        if max <= SCORE_THRESHOLD {
            return None;
        }
        ClassLabel::ALL
            .into_iter()
            .find(|label| self.get(*label) == max)
            .map(|label| (label, max))
    }
}

fn points(condition: bool, weight: u32) -> u32 {
    if condition { weight } else { 0 }
}
