//! Class balancing by deterministic synthetic oversampling.
//!
//! The pieces, leaf to root:
//!
//! - [`EntropySource`] / [`StringHash`]: reproducible pseudo-randomness keyed on
//!   a record and a seed.
//! - [`classify_columns`]: numeric vs categorical decision per field.
//! - [`SyntheticGenerator`]: SMOTE-like interpolation between two parents, or
//!   ±5% perturbation when a class has a single sample.
//! - [`ClassBalancer`]: raises every class to the majority count.
//!
//! No nearest-neighbour search is performed; parent pairs are chosen by hash,
//! so identical input always yields identical synthetic rows.

mod balancer;
mod classify;
mod error;
mod generator;
mod hasher;

pub use balancer::{BalanceOutcome, ClassBalancer, class_seed, passthrough};
pub use classify::{
    CATEGORICAL_TOKENS, CLASSIFY_SAMPLE_SIZE, ColumnKind, ColumnKinds, classify_columns,
    is_numeric_value,
};
pub use error::{BalanceError, Result};
pub use generator::{SyntheticGenerator, round_synthetic};
pub use hasher::{EntropySource, StringHash, char_seed, string_hash};
