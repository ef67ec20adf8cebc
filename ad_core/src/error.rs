//! Errors raised while building the computation graph.
//!
//! Every failure happens at construction time: an operation that returns an
//! error never allocates a node. The backward pass itself cannot fail.

use thiserror::Error;

use crate::node::NodeId;

/// Failures surfaced by the engine's primitive operations.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// `powf` was given an exponent that is NaN or infinite.
    #[error("invalid exponent {exponent}: only finite real exponents are supported")]
    InvalidExponent { exponent: f64 },

    /// A negative exponent was applied to a base whose value is exactly zero
    /// (this is also how division by zero surfaces).
    #[error("domain error: zero base raised to negative exponent {exponent}")]
    DomainError { exponent: f64 },

    /// Only leaves may have their value replaced.
    #[error("node {id:?} is not a leaf; only leaf values can be updated")]
    NotALeaf { id: NodeId },
}

/// Result alias for engine operations.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
