//! Full-batch training loop.

use ad_core::Value;
use log::{debug, info};

use crate::data::Dataset;
use crate::error::{NnError, Result};
use crate::layers::Mlp;
use crate::loss::mse_loss;
use crate::module::Module;
use crate::optim::Sgd;

/// Settings for [`fit`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub momentum: f64,
    /// Log the loss every this many epochs (0 disables progress logging).
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 100,
            learning_rate: 0.05,
            momentum: 0.0,
            log_every: 10,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(NnError::InvalidConfig("epochs must be positive".to_string()));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NnError::InvalidConfig(format!(
                "learning rate must be a finite positive number, got {}",
                self.learning_rate
            )));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(NnError::InvalidConfig(format!(
                "momentum must be in [0, 1), got {}",
                self.momentum
            )));
        }
        Ok(())
    }

    /// An optimizer matching this configuration.
    pub fn optimizer(&self) -> Sgd {
        Sgd::with_momentum(self.learning_rate, self.momentum)
    }
}

/// Loss history of a training run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrainReport {
    /// Loss before the update of each epoch.
    pub losses: Vec<f64>,
}

impl TrainReport {
    pub fn initial_loss(&self) -> Option<f64> {
        self.losses.first().copied()
    }

    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }
}

/// Mean squared error of `model` over the whole dataset, as a graph node.
pub fn dataset_loss(model: &Mlp, data: &Dataset) -> Result<Value> {
    let mut preds = Vec::with_capacity(data.len() * data.nout());
    let mut targets = Vec::with_capacity(data.len() * data.nout());
    for (x, y) in data.iter() {
        let inputs: Vec<Value> = x.iter().copied().map(Value::new).collect();
        preds.extend(model.forward(&inputs)?);
        targets.extend_from_slice(y);
    }
    mse_loss(&preds, &targets)
}

/// Train `model` with full-batch gradient descent.
///
/// Each epoch rebuilds the graph: forward over every sample, reset parameter
/// gradients, backpropagate the mean squared error, then take one optimizer step.
pub fn fit(model: &Mlp, data: &Dataset, opt: &mut Sgd, config: &TrainConfig) -> Result<TrainReport> {
    config.validate()?;
    if data.nin() != model.nin() {
        return Err(NnError::InputSize {
            expected: model.nin(),
            actual: data.nin(),
        });
    }

    let params = model.parameters();
    debug!(
        "training {} parameters on {} samples for {} epochs",
        params.len(),
        data.len(),
        config.epochs
    );

    let mut report = TrainReport::default();
    for epoch in 0..config.epochs {
        let loss = dataset_loss(model, data)?;
        model.zero_grad();
        loss.backward();
        opt.step(&params)?;

        report.losses.push(loss.value());
        let last = epoch + 1 == config.epochs;
        if config.log_every > 0 && (epoch % config.log_every == 0 || last) {
            info!("epoch {:4}: loss = {:.6}", epoch, loss.value());
        }
    }
    Ok(report)
}
