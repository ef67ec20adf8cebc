//! Activation functions.

use std::fmt;
use std::str::FromStr;

use ad_core::Value;

use crate::error::NnError;

/// Nonlinearity applied to a neuron's pre-activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Identity: the pre-activation is passed through unchanged.
    #[default]
    Linear,
    Relu,
    Tanh,
    Sigmoid,
}

impl Activation {
    pub fn apply(self, x: &Value) -> Value {
        match self {
            Activation::Linear => x.clone(),
            Activation::Relu => x.relu(),
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => x.sigmoid(),
        }
    }

    /// Apply element-wise, as a parameter-free activation layer.
    pub fn apply_all(self, xs: &[Value]) -> Vec<Value> {
        xs.iter().map(|x| self.apply(x)).collect()
    }

    /// Name used when printing neurons, e.g. `ReLUNeuron(3)`.
    pub fn display_name(self) -> &'static str {
        match self {
            Activation::Linear => "Linear",
            Activation::Relu => "ReLU",
            Activation::Tanh => "Tanh",
            Activation::Sigmoid => "Sigmoid",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Activation::Linear => "linear",
            Activation::Relu => "relu",
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
        };
        f.write_str(name)
    }
}

impl FromStr for Activation {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" | "identity" | "none" => Ok(Activation::Linear),
            "relu" => Ok(Activation::Relu),
            "tanh" => Ok(Activation::Tanh),
            "sigmoid" => Ok(Activation::Sigmoid),
            other => Err(NnError::InvalidConfig(format!(
                "unknown activation '{other}' (expected linear, relu, tanh or sigmoid)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_apply_all() {
        let xs: Vec<Value> = [-2.0, -1.0, 0.0, 1.0, 2.0].into_iter().map(Value::new).collect();
        let ys: Vec<f64> = Activation::Relu.apply_all(&xs).iter().map(Value::value).collect();
        assert_eq!(ys, vec![0.0, 0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_sigmoid_and_tanh() {
        let x = Value::new(0.0);
        assert_abs_diff_eq!(Activation::Sigmoid.apply(&x).value(), 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(Activation::Tanh.apply(&x).value(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_linear_is_identity() {
        let x = Value::new(-4.25);
        assert!(Activation::Linear.apply(&x).ptr_eq(&x));
    }

    #[test]
    fn test_parse_round_trip() {
        for act in [
            Activation::Linear,
            Activation::Relu,
            Activation::Tanh,
            Activation::Sigmoid,
        ] {
            assert_eq!(act.to_string().parse::<Activation>().unwrap(), act);
        }
        assert_eq!("ReLU".parse::<Activation>().unwrap(), Activation::Relu);
        assert!(matches!(
            "softplus".parse::<Activation>(),
            Err(NnError::InvalidConfig(_))
        ));
    }
}
