//! Stochastic Gradient Descent optimizer.

use std::collections::HashMap;

use ad_core::{NodeId, Value};
use log::debug;

use crate::error::Result;

/// SGD optimizer with optional momentum.
#[derive(Debug, Clone)]
pub struct Sgd {
    /// Learning rate.
    pub lr: f64,
    /// Momentum coefficient.
    pub momentum: f64,
    /// Velocity buffers for momentum, keyed by parameter node.
    velocities: HashMap<NodeId, f64>,
}

impl Sgd {
    /// Create a new SGD optimizer.
    pub fn new(lr: f64) -> Self {
        Sgd::with_momentum(lr, 0.0)
    }

    /// Create an SGD optimizer with momentum.
    pub fn with_momentum(lr: f64, momentum: f64) -> Self {
        Sgd {
            lr,
            momentum,
            velocities: HashMap::new(),
        }
    }

    /// Update every parameter in place from its current gradient.
    ///
    /// Parameters must be leaves; anything else is reported as an engine error.
    pub fn step(&mut self, params: &[Value]) -> Result<()> {
        for p in params {
            let grad = p.grad();
            let update = if self.momentum > 0.0 {
                // v = momentum * v + grad; param = param - lr * v
                let velocity = self.velocities.entry(p.id()).or_insert(0.0);
                *velocity = self.momentum * *velocity + grad;
                *velocity
            } else {
                grad
            };
            p.set_value(p.value() - self.lr * update)?;
        }
        debug!(
            "sgd step over {} parameters (lr={}, momentum={})",
            params.len(),
            self.lr,
            self.momentum
        );
        Ok(())
    }

    /// Reset the gradients of `params`.
    pub fn zero_grad(&self, params: &[Value]) {
        ad_core::zero_grad(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NnError;
    use ad_core::EngineError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sgd_step() {
        let params = [Value::new(1.0), Value::new(2.0), Value::new(3.0)];
        // loss = 0.1*p0 + 0.2*p1 + 0.3*p2
        let loss = ad_core::sum(
            params
                .iter()
                .zip([0.1, 0.2, 0.3])
                .map(|(p, c)| p.multiply(c)),
        );
        loss.backward();

        let mut opt = Sgd::new(0.1);
        opt.step(&params).unwrap();

        let expected = [0.99, 1.98, 2.97];
        for (p, e) in params.iter().zip(expected) {
            assert_abs_diff_eq!(p.value(), e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sgd_with_momentum() {
        let param = Value::new(1.0);
        let mut opt = Sgd::with_momentum(0.1, 0.9);

        // First step: v = 1, param = 1 - 0.1 * 1 = 0.9
        param.multiply(1.0).backward();
        opt.step(std::slice::from_ref(&param)).unwrap();
        assert_abs_diff_eq!(param.value(), 0.9, epsilon = 1e-12);

        // Second step with the same gradient: v = 0.9 + 1 = 1.9, param = 0.9 - 0.19
        param.zero_grad();
        param.multiply(1.0).backward();
        opt.step(std::slice::from_ref(&param)).unwrap();
        assert_abs_diff_eq!(param.value(), 0.71, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_grad() {
        let params = [Value::new(1.0), Value::new(2.0)];
        (&params[0] * &params[1]).backward();

        let opt = Sgd::new(0.1);
        opt.zero_grad(&params);
        assert!(params.iter().all(|p| p.grad() == 0.0));
    }

    #[test]
    fn test_step_rejects_internal_nodes() {
        let x = Value::new(1.0);
        let y = x.exp();
        let err = Sgd::new(0.1).step(&[y.clone()]).unwrap_err();
        assert_eq!(err, NnError::Engine(EngineError::NotALeaf { id: y.id() }));
    }
}
