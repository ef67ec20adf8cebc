//! A single trainable unit.

use std::fmt;

use ad_core::Value;
use rand::Rng;

use crate::activations::Activation;
use crate::error::{NnError, Result};
use crate::module::Module;

/// `activation(sum_i w_i * x_i + b)`
#[derive(Debug, Clone)]
pub struct Neuron {
    weights: Vec<Value>,
    bias: Value,
    activation: Activation,
}

impl Neuron {
    /// Create a neuron with `nin` weights drawn uniformly from [-1, 1] and a zero bias.
    pub fn new<R: Rng>(nin: usize, activation: Activation, rng: &mut R) -> Self {
        let weights = (0..nin)
            .map(|i| Value::var(&format!("w{i}"), rng.gen_range(-1.0..=1.0)))
            .collect();
        Neuron {
            weights,
            bias: Value::var("b", 0.0),
            activation,
        }
    }

    /// Create a neuron from explicit parameter values.
    pub fn from_weights(weights: &[f64], bias: f64, activation: Activation) -> Self {
        Neuron {
            weights: weights
                .iter()
                .enumerate()
                .map(|(i, &w)| Value::var(&format!("w{i}"), w))
                .collect(),
            bias: Value::var("b", bias),
            activation,
        }
    }

    pub fn nin(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &[Value] {
        &self.weights
    }

    pub fn bias(&self) -> &Value {
        &self.bias
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Forward pass. The products are summed left to right and the bias is
    /// added last, so results are reproducible bit for bit.
    pub fn forward(&self, x: &[Value]) -> Result<Value> {
        if x.len() != self.weights.len() {
            return Err(NnError::InputSize {
                expected: self.weights.len(),
                actual: x.len(),
            });
        }
        let weighted = ad_core::sum(self.weights.iter().zip(x).map(|(w, xi)| w.multiply(xi)));
        let pre_activation = weighted.add(&self.bias);
        Ok(self.activation.apply(&pre_activation))
    }
}

impl Module for Neuron {
    fn parameters(&self) -> Vec<Value> {
        let mut params = self.weights.clone();
        params.push(self.bias.clone());
        params
    }
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Neuron({})", self.activation.display_name(), self.nin())
    }
}
