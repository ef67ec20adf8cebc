//! The trait shared by neurons, layers and networks.

use ad_core::Value;

/// A component owning trainable leaves.
pub trait Module {
    /// Every trainable leaf, flattened in a stable order: neuron by neuron,
    /// weights before bias, layer by layer.
    fn parameters(&self) -> Vec<Value>;

    /// Reset the gradient of exactly the values returned by [`Module::parameters`].
    ///
    /// Intermediate nodes are not touched; they are rebuilt on every forward pass.
    fn zero_grad(&self) {
        ad_core::zero_grad(&self.parameters());
    }

    fn num_parameters(&self) -> usize {
        self.parameters().len()
    }
}
