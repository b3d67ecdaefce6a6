use thiserror::Error;

#[derive(Debug, Error)]
pub enum BalanceError {
    /// Every class is empty, so there is nothing to balance or evaluate.
    #[error("no valid records to process: every class is empty")]
    NoSamples,
}

pub type Result<T> = std::result::Result<T, BalanceError>;
