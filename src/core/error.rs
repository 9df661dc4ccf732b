//! Error types for kernel-method fitting and model selection

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KMethodError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    Dimension { expected: usize, actual: usize },

    #[error("Model not fitted")]
    NotFitted,

    #[error("Optimization failed: {0}")]
    Optimization(String),

    #[error("Unsupported method family: {0}")]
    UnsupportedMethod(String),

    #[error("Invalid label: expected -1 or +1, got {0}")]
    InvalidLabel(f64),

    #[error("Empty dataset")]
    EmptyDataset,
}

pub type Result<T> = std::result::Result<T, KMethodError>;
