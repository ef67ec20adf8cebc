//! Multi-layer perceptron.

use std::fmt;

use ad_core::Value;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::activations::Activation;
use crate::error::{NnError, Result};
use crate::layers::Layer;
use crate::module::Module;

/// Layers applied in order, each feeding its outputs to the next.
#[derive(Debug, Clone)]
pub struct Mlp {
    layers: Vec<Layer>,
}

impl Mlp {
    /// Create a network with `nin` inputs and one layer per entry of `nouts`.
    ///
    /// Every layer except the last uses `hidden`; the output layer is linear.
    pub fn new<R: Rng>(
        nin: usize,
        nouts: &[usize],
        hidden: Activation,
        rng: &mut R,
    ) -> Result<Self> {
        if nouts.is_empty() {
            return Err(NnError::InvalidConfig(
                "a network needs at least one layer".to_string(),
            ));
        }
        if nouts.contains(&0) {
            return Err(NnError::InvalidConfig(format!(
                "layer sizes must be positive, got {nouts:?}"
            )));
        }

        let sizes: Vec<usize> = std::iter::once(nin).chain(nouts.iter().copied()).collect();
        let last = nouts.len() - 1;
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let activation = if i == last { Activation::Linear } else { hidden };
                Layer::new(pair[0], pair[1], activation, &mut *rng)
            })
            .collect();
        Ok(Mlp { layers })
    }

    /// Same as [`Mlp::new`] with weights drawn from a `StdRng` seeded with `seed`.
    pub fn seeded(nin: usize, nouts: &[usize], hidden: Activation, seed: u64) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(seed);
        Mlp::new(nin, nouts, hidden, &mut rng)
    }

    /// Chain existing layers; each layer's input size must match the previous output size.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self> {
        if layers.is_empty() {
            return Err(NnError::InvalidConfig(
                "a network needs at least one layer".to_string(),
            ));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].nout() != pair[1].nin() {
                return Err(NnError::InvalidConfig(format!(
                    "layer {} outputs {} values but layer {} expects {}",
                    i,
                    pair[0].nout(),
                    i + 1,
                    pair[1].nin()
                )));
            }
        }
        Ok(Mlp { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn nin(&self) -> usize {
        self.layers.first().map_or(0, Layer::nin)
    }

    pub fn nout(&self) -> usize {
        self.layers.last().map_or(0, Layer::nout)
    }

    pub fn forward(&self, x: &[Value]) -> Result<Vec<Value>> {
        let mut activations = x.to_vec();
        for layer in &self.layers {
            activations = layer.forward(&activations)?;
        }
        Ok(activations)
    }

    /// Forward pass for a network with a single output.
    pub fn forward_scalar(&self, x: &[Value]) -> Result<Value> {
        let mut out = self.forward(x)?;
        match out.len() {
            1 => Ok(out.remove(0)),
            outputs => Err(NnError::NotScalarOutput { outputs }),
        }
    }

    /// Evaluate on plain numbers, wrapping each input in a fresh leaf.
    pub fn predict(&self, x: &[f64]) -> Result<Vec<f64>> {
        let inputs: Vec<Value> = x.iter().copied().map(Value::new).collect();
        Ok(self.forward(&inputs)?.iter().map(Value::value).collect())
    }
}

impl Module for Mlp {
    fn parameters(&self) -> Vec<Value> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }
}

impl fmt::Display for Mlp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layers: Vec<String> = self.layers.iter().map(Layer::to_string).collect();
        write!(f, "MLP of [{}]", layers.join(", "))
    }
}
