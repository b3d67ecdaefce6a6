use serde::Serialize;

use crate::label::ClassLabel;
use crate::record::Record;

/// A record tagged with its normalized class.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub record: Record,
    pub label: ClassLabel,
    pub is_synthetic: bool,
}

impl Sample {
    pub fn real(record: Record, label: ClassLabel) -> Self {
        Self {
            record,
            label,
            is_synthetic: false,
        }
    }

    pub fn synthetic(record: Record, label: ClassLabel) -> Self {
        Self {
            record,
            label,
            is_synthetic: true,
        }
    }
}

/// Per-class sample counts before and after balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassCount {
    pub label: ClassLabel,
    pub original: usize,
    pub synthetic: usize,
}

impl ClassCount {
    pub fn total(&self) -> usize {
        self.original + self.synthetic
    }
}

/// Counts for every class, in confusion-matrix order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassCounts {
    counts: [ClassCount; ClassLabel::COUNT],
}

impl Default for ClassCounts {
    fn default() -> Self {
        Self {
            counts: ClassLabel::ALL.map(|label| ClassCount {
                label,
                original: 0,
                synthetic: 0,
            }),
        }
    }
}

impl ClassCounts {
    pub fn get(&self, label: ClassLabel) -> &ClassCount {
        &self.counts[label.index()]
    }

    pub fn get_mut(&mut self, label: ClassLabel) -> &mut ClassCount {
        &mut self.counts[label.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassCount> {
        self.counts.iter()
    }

    pub fn total_original(&self) -> usize {
        self.counts.iter().map(|count| count.original).sum()
    }

    pub fn total_synthetic(&self) -> usize {
        self.counts.iter().map(|count| count.synthetic).sum()
    }

    pub fn total(&self) -> usize {
        self.total_original() + self.total_synthetic()
    }

    /// Largest original count across classes.
    pub fn max_original(&self) -> usize {
        self.counts
            .iter()
            .map(|count| count.original)
            .max()
            .unwrap_or(0)
    }
}
