//! # ad_nn - Neural Network Building Blocks for ad_core
//!
//! This crate composes `ad_core` scalars into trainable components:
//!
//! - **Layers**: [`Neuron`], [`Layer`], [`Mlp`]
//! - **Activations**: [`Activation`] (linear, ReLU, tanh, sigmoid)
//! - **Losses**: sum of squared errors, MSE
//! - **Optimizers**: [`Sgd`] (with optional momentum)
//! - **Training**: [`fit`] over a [`Dataset`]
//!
//! Every component implements [`Module`], which exposes its parameters as
//! `ad_core::Value` leaves and resets their gradients.
//!
//! ## Example: Training a Small MLP
//!
//! ```
//! use ad_core::Value;
//! use ad_nn::{mse_loss, Activation, Mlp, Module, Sgd};
//!
//! let model = Mlp::seeded(2, &[4, 1], Activation::Tanh, 0).unwrap();
//! let mut opt = Sgd::new(0.05);
//! let params = model.parameters();
//!
//! for _ in 0..10 {
//!     let x = [Value::new(1.0), Value::new(-1.0)];
//!     let pred = model.forward(&x).unwrap();
//!     let loss = mse_loss(&pred, &[0.5]).unwrap();
//!
//!     model.zero_grad();
//!     loss.backward();
//!     opt.step(&params).unwrap();
//! }
//! ```

pub mod activations;
pub mod data;
pub mod error;
pub mod layers;
pub mod loss;
pub mod module;
pub mod optim;
pub mod train;

// Re-exports for convenience
pub use activations::Activation;
pub use data::{Dataset, Gate};
pub use error::{NnError, Result};
pub use layers::{Layer, Mlp, Neuron};
pub use loss::{mse_loss, sum_squared_error};
pub use module::Module;
pub use optim::Sgd;
pub use train::{dataset_loss, fit, TrainConfig, TrainReport};
