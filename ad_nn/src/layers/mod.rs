//! Neuron, layer and multi-layer perceptron.

mod layer;
mod mlp;
mod neuron;

pub use layer::Layer;
pub use mlp::Mlp;
pub use neuron::Neuron;
