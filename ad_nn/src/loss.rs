//! Loss functions.

use ad_core::Value;

use crate::error::{NnError, Result};

fn check_sizes(preds: &[Value], targets: &[f64]) -> Result<()> {
    if preds.len() != targets.len() {
        return Err(NnError::TargetSize {
            predictions: preds.len(),
            targets: targets.len(),
        });
    }
    Ok(())
}

/// Sum of squared errors: sum((pred - target)^2)
pub fn sum_squared_error(preds: &[Value], targets: &[f64]) -> Result<Value> {
    check_sizes(preds, targets)?;
    let terms = preds
        .iter()
        .zip(targets)
        .map(|(p, &t)| p.subtract(t).powf(2.0))
        .collect::<ad_core::Result<Vec<_>>>()?;
    Ok(ad_core::sum(terms))
}

/// Mean Squared Error loss: mean((pred - target)^2)
pub fn mse_loss(preds: &[Value], targets: &[f64]) -> Result<Value> {
    if preds.is_empty() {
        return Err(NnError::EmptyDataset);
    }
    let sse = sum_squared_error(preds, targets)?;
    Ok(sse.multiply(1.0 / preds.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sum_squared_error() {
        let preds = [Value::new(1.0), Value::new(-2.0)];
        let loss = sum_squared_error(&preds, &[0.5, 1.0]).unwrap();
        assert_eq!(loss.value(), 0.25 + 9.0);

        loss.backward();
        // d/dp (p - t)^2 = 2(p - t)
        assert_eq!(preds[0].grad(), 1.0);
        assert_eq!(preds[1].grad(), -6.0);
    }

    #[test]
    fn test_mse_loss() {
        let preds = [Value::new(3.0), Value::new(1.0)];
        let loss = mse_loss(&preds, &[1.0, 1.0]).unwrap();
        assert_abs_diff_eq!(loss.value(), 2.0, epsilon = 1e-15);

        loss.backward();
        assert_abs_diff_eq!(preds[0].grad(), 2.0, epsilon = 1e-15);
        assert_eq!(preds[1].grad(), 0.0);
    }

    #[test]
    fn test_size_errors() {
        let preds = [Value::new(1.0)];
        assert_eq!(
            mse_loss(&preds, &[1.0, 2.0]).unwrap_err(),
            NnError::TargetSize {
                predictions: 1,
                targets: 2
            }
        );
        assert_eq!(mse_loss(&[], &[]).unwrap_err(), NnError::EmptyDataset);
    }
}
