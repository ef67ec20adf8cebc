//! A fully connected layer of neurons.

use std::fmt;

use ad_core::Value;
use rand::Rng;

use crate::activations::Activation;
use crate::error::{NnError, Result};
use crate::layers::Neuron;
use crate::module::Module;

/// `nout` neurons that all read the same input vector.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
    nin: usize,
}

impl Layer {
    /// Create a layer with randomly initialized neurons.
    pub fn new<R: Rng>(nin: usize, nout: usize, activation: Activation, rng: &mut R) -> Self {
        let neurons = (0..nout)
            .map(|_| Neuron::new(nin, activation, &mut *rng))
            .collect();
        Layer { neurons, nin }
    }

    /// Build a layer from existing neurons, which must agree on their input size.
    pub fn from_neurons(neurons: Vec<Neuron>) -> Result<Self> {
        let nin = neurons.first().map(Neuron::nin).ok_or_else(|| {
            NnError::InvalidConfig("a layer needs at least one neuron".to_string())
        })?;
        if let Some(bad) = neurons.iter().find(|n| n.nin() != nin) {
            return Err(NnError::InvalidConfig(format!(
                "neurons disagree on input size: {} vs {}",
                nin,
                bad.nin()
            )));
        }
        Ok(Layer { neurons, nin })
    }

    pub fn nin(&self) -> usize {
        self.nin
    }

    pub fn nout(&self) -> usize {
        self.neurons.len()
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    /// One output per neuron, in neuron order.
    pub fn forward(&self, x: &[Value]) -> Result<Vec<Value>> {
        if x.len() != self.nin {
            return Err(NnError::InputSize {
                expected: self.nin,
                actual: x.len(),
            });
        }
        self.neurons.iter().map(|n| n.forward(x)).collect()
    }
}

impl Module for Layer {
    fn parameters(&self) -> Vec<Value> {
        self.neurons.iter().flat_map(|n| n.parameters()).collect()
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let neurons: Vec<String> = self.neurons.iter().map(Neuron::to_string).collect();
        write!(f, "Layer of [{}]", neurons.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_layer_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = Layer::new(3, 4, Activation::Tanh, &mut rng);

        assert_eq!(layer.nin(), 3);
        assert_eq!(layer.nout(), 4);
        assert_eq!(layer.num_parameters(), 4 * (3 + 1));

        let x: Vec<Value> = [0.1, 0.2, 0.3].into_iter().map(Value::new).collect();
        assert_eq!(layer.forward(&x).unwrap().len(), 4);
    }

    #[test]
    fn test_parameter_order() {
        let layer = Layer::from_neurons(vec![
            Neuron::from_weights(&[1.0, 2.0], 3.0, Activation::Linear),
            Neuron::from_weights(&[4.0, 5.0], 6.0, Activation::Linear),
        ])
        .unwrap();

        let values: Vec<f64> = layer.parameters().iter().map(Value::value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_shared_input_accumulates_across_neurons() {
        let layer = Layer::from_neurons(vec![
            Neuron::from_weights(&[2.0], 0.0, Activation::Linear),
            Neuron::from_weights(&[-0.5], 0.0, Activation::Linear),
        ])
        .unwrap();
        let x = [Value::new(1.0)];
        let out = layer.forward(&x).unwrap();

        ad_core::sum(out).backward();
        assert_eq!(x[0].grad(), 1.5);
    }

    #[test]
    fn test_from_neurons_validation() {
        assert!(matches!(
            Layer::from_neurons(Vec::new()),
            Err(NnError::InvalidConfig(_))
        ));
        assert!(matches!(
            Layer::from_neurons(vec![
                Neuron::from_weights(&[1.0], 0.0, Activation::Linear),
                Neuron::from_weights(&[1.0, 2.0], 0.0, Activation::Linear),
            ]),
            Err(NnError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_display() {
        let layer = Layer::from_neurons(vec![
            Neuron::from_weights(&[1.0, 2.0], 0.0, Activation::Relu),
            Neuron::from_weights(&[1.0, 2.0], 0.0, Activation::Relu),
        ])
        .unwrap();
        assert_eq!(layer.to_string(), "Layer of [ReLUNeuron(2), ReLUNeuron(2)]");
    }
}
