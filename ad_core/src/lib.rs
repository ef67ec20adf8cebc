//! # ad_core - Scalar Reverse-mode Automatic Differentiation
//!
//! This crate provides a small reverse-mode autodiff engine over `f64` scalars.
//! Every operation allocates one graph node holding its forward value, a
//! gradient accumulator and shared handles to its operands. A single backward
//! pass from any node fills in d(root)/d(node) for every node it can reach.
//!
//! ## Quick Start
//!
//! ```
//! use ad_core::var;
//!
//! let x = var("x", 2.0);
//! let y = var("y", 3.0);
//!
//! // z = x * y + exp(x)
//! let z = &x * &y + x.exp();
//! assert!((z.value() - (6.0 + 2.0_f64.exp())).abs() < 1e-12);
//!
//! z.backward();
//!
//! // dz/dx = y + exp(x), dz/dy = x
//! assert!((x.grad() - (3.0 + 2.0_f64.exp())).abs() < 1e-12);
//! assert!((y.grad() - 2.0).abs() < 1e-12);
//! ```
//!
//! ## Supported Operations
//!
//! | Category | Operations |
//! |----------|------------|
//! | Primitives | [`Value::add`], [`Value::multiply`], [`Value::powf`], [`Value::exp`] |
//! | Activations | [`Value::relu`], [`Value::tanh`], [`Value::sigmoid`] |
//! | Derived | [`Value::negate`], [`Value::subtract`], [`Value::divide`] |
//! | Operators | `+`, `-`, `*`, unary `-` (with `f64` on either side) |
//!
//! Derived operations are built from the primitives, so they share their
//! derivative rules. `powf` and `divide` are fallible, see [`EngineError`].
//!
//! ## Gradient accumulation
//!
//! Gradients are summed, never overwritten: a node used by several consumers
//! receives every contribution. The backward pass does not clear old values, so
//! reset with [`zero_grad`] (a parameter list) or [`Value::zero_grad_reachable`]
//! (a whole graph) before reusing nodes.
//!
//! ```
//! use ad_core::{value, zero_grad};
//!
//! let a = value(2.0);
//! let b = value(3.0);
//! let c = value(4.0);
//! let out = &a * &b + &a * &c;
//!
//! out.backward();
//! assert_eq!(a.grad(), 7.0); // b + c
//!
//! zero_grad([&a, &b, &c]);
//! assert_eq!(a.grad(), 0.0);
//! ```

mod backward;
mod error;
mod finite_diff;
mod node;
mod ops;

pub use backward::{topological_order, zero_grad};
pub use error::{EngineError, Result};
pub use finite_diff::{check_gradients, finite_diff_grad, max_grad_error, GradCheck};
pub use node::{NodeId, Op, Value};
pub use ops::sum;

/// Create an unlabelled leaf holding `value`.
pub fn value(value: f64) -> Value {
    Value::new(value)
}

/// Create a labelled leaf. Each call creates a distinct node, even if the label repeats.
pub fn var(label: &str, value: f64) -> Value {
    Value::var(label, value)
}
