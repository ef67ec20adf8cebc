//! Optimizers for neural network training.

mod sgd;

pub use sgd::Sgd;
