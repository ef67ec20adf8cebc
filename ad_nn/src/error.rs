//! Errors raised by the composition layer.

use ad_core::EngineError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NnError {
    /// A primitive operation failed while building the graph.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("input size mismatch: expected {expected} values, got {actual}")]
    InputSize { expected: usize, actual: usize },

    #[error("target size mismatch: {predictions} predictions for {targets} targets")]
    TargetSize { predictions: usize, targets: usize },

    #[error("network has {outputs} outputs, expected exactly one")]
    NotScalarOutput { outputs: usize },

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T, E = NnError> = std::result::Result<T, E>;
