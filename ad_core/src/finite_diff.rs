//! Finite difference utilities for gradient verification.
//!
//! Provides numerical gradients and a one-call comparison against the engine's
//! backward pass.

use crate::error::Result;
use crate::node::Value;

/// Compute gradients using central finite differences.
///
/// # Arguments
/// * `f` - Function that takes a slice of variable values and returns a scalar
/// * `point` - The point at which to compute gradients
/// * `eps` - Step size for finite differences (typically 1e-7 to 1e-5)
///
/// # Example
/// ```
/// use ad_core::finite_diff_grad;
///
/// // f(x, y) = x^2 + y^2
/// let f = |v: &[f64]| v[0] * v[0] + v[1] * v[1];
/// let grads = finite_diff_grad(f, &[3.0, 4.0], 1e-7);
///
/// assert!((grads[0] - 6.0).abs() < 1e-5);
/// assert!((grads[1] - 8.0).abs() < 1e-5);
/// ```
pub fn finite_diff_grad<F>(f: F, point: &[f64], eps: f64) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut perturbed = point.to_vec();
    (0..point.len())
        .map(|i| {
            perturbed[i] = point[i] + eps;
            let f_plus = f(&perturbed);
            perturbed[i] = point[i] - eps;
            let f_minus = f(&perturbed);
            perturbed[i] = point[i];
            (f_plus - f_minus) / (2.0 * eps)
        })
        .collect()
}

/// Maximum absolute difference between two gradient vectors.
pub fn max_grad_error(grad1: &[f64], grad2: &[f64]) -> f64 {
    debug_assert_eq!(grad1.len(), grad2.len());
    grad1
        .iter()
        .zip(grad2)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

/// Outcome of comparing backpropagated gradients with finite differences.
#[derive(Debug, Clone, PartialEq)]
pub struct GradCheck {
    /// Forward value at the checked point.
    pub value: f64,
    /// Gradients from the backward pass, one per input.
    pub analytic: Vec<f64>,
    /// Central-difference estimates, one per input.
    pub numeric: Vec<f64>,
    pub max_error: f64,
}

impl GradCheck {
    pub fn passes(&self, tolerance: f64) -> bool {
        self.max_error < tolerance
    }
}

/// Build a graph from fresh leaves at `point`, backpropagate, and compare the
/// leaf gradients with central differences of the same builder.
///
/// Any construction error (at `point` or at a perturbed point) is returned.
///
/// # Example
/// ```
/// use ad_core::check_gradients;
///
/// let check = check_gradients(|v| Ok((&v[0] * &v[1]).tanh()), &[0.5, -1.5], 1e-6).unwrap();
/// assert!(check.passes(1e-6));
/// ```
pub fn check_gradients<F>(build: F, point: &[f64], eps: f64) -> Result<GradCheck>
where
    F: Fn(&[Value]) -> Result<Value>,
{
    let eval = |values: &[f64]| -> Result<f64> {
        let leaves: Vec<Value> = values.iter().copied().map(Value::new).collect();
        Ok(build(&leaves)?.value())
    };

    let leaves: Vec<Value> = point.iter().copied().map(Value::new).collect();
    let out = build(&leaves)?;
    out.backward();
    let analytic: Vec<f64> = leaves.iter().map(Value::grad).collect();

    let mut numeric = Vec::with_capacity(point.len());
    let mut perturbed = point.to_vec();
    for i in 0..point.len() {
        perturbed[i] = point[i] + eps;
        let f_plus = eval(&perturbed)?;
        perturbed[i] = point[i] - eps;
        let f_minus = eval(&perturbed)?;
        perturbed[i] = point[i];
        numeric.push((f_plus - f_minus) / (2.0 * eps));
    }

    let max_error = max_grad_error(&analytic, &numeric);
    Ok(GradCheck {
        value: out.value(),
        analytic,
        numeric,
        max_error,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_finite_diff_quadratic() {
        // df/dx = df/dy = 2x + 2y
        let f = |v: &[f64]| v[0] * v[0] + 2.0 * v[0] * v[1] + v[1] * v[1];
        let grads = finite_diff_grad(f, &[1.0, 2.0], 1e-7);

        assert_abs_diff_eq!(grads[0], 6.0, epsilon = 1e-5);
        assert_abs_diff_eq!(grads[1], 6.0, epsilon = 1e-5);
    }

    #[test]
    fn test_max_grad_error() {
        let err = max_grad_error(&[1.0, 2.0, 3.0], &[1.1, 2.0, 2.8]);
        assert_abs_diff_eq!(err, 0.2, epsilon = 1e-10);
    }

    #[test]
    fn test_check_gradients_activations() {
        let check = check_gradients(
            |v| {
                let h = (&v[0] * &v[1]).tanh() + v[1].sigmoid();
                Ok(h.exp() - v[0].relu())
            },
            &[0.7, -0.4],
            1e-6,
        )
        .unwrap();

        assert_eq!(check.analytic.len(), 2);
        assert!(check.passes(1e-6), "max error {}", check.max_error);
    }

    #[test]
    fn test_check_gradients_division() {
        // f(x, y) = x / y
        let check = check_gradients(|v| v[0].divide(&v[1]), &[3.0, 4.0], 1e-6).unwrap();
        assert_abs_diff_eq!(check.value, 0.75, epsilon = 1e-15);
        assert_abs_diff_eq!(check.analytic[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(check.analytic[1], -3.0 / 16.0, epsilon = 1e-12);
        assert!(check.passes(1e-6));
    }

    #[test]
    fn test_check_gradients_surfaces_construction_errors() {
        let err = check_gradients(|v| v[0].divide(&v[1]), &[1.0, 0.0], 1e-6).unwrap_err();
        assert_eq!(err, EngineError::DomainError { exponent: -1.0 });
    }
}
