//! In-memory datasets.

use std::fmt;
use std::str::FromStr;

use crate::error::{NnError, Result};

/// Paired input and target rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
}

impl Dataset {
    /// Rows must be non-empty, equal in number, and consistent in width.
    pub fn new(inputs: Vec<Vec<f64>>, targets: Vec<Vec<f64>>) -> Result<Self> {
        if inputs.is_empty() {
            return Err(NnError::EmptyDataset);
        }
        if inputs.len() != targets.len() {
            return Err(NnError::TargetSize {
                predictions: inputs.len(),
                targets: targets.len(),
            });
        }
        let (nin, nout) = (inputs[0].len(), targets[0].len());
        if inputs.iter().any(|row| row.len() != nin) || targets.iter().any(|row| row.len() != nout)
        {
            return Err(NnError::InvalidConfig(
                "dataset rows must all have the same width".to_string(),
            ));
        }
        Ok(Dataset { inputs, targets })
    }

    /// The four rows of a two-input truth table, with targets 0.0 / 1.0.
    pub fn logic_gate(gate: Gate) -> Self {
        let inputs: Vec<Vec<f64>> = vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ];
        let targets = inputs
            .iter()
            .map(|row| {
                let (a, b) = (row[0] > 0.5, row[1] > 0.5);
                let out = match gate {
                    Gate::Xor => a ^ b,
                    Gate::And => a && b,
                    Gate::Or => a || b,
                };
                vec![if out { 1.0 } else { 0.0 }]
            })
            .collect();
        Dataset { inputs, targets }
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn nin(&self) -> usize {
        self.inputs[0].len()
    }

    pub fn nout(&self) -> usize {
        self.targets[0].len()
    }

    pub fn inputs(&self) -> &[Vec<f64>] {
        &self.inputs
    }

    pub fn targets(&self) -> &[Vec<f64>] {
        &self.targets
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[f64], &[f64])> {
        self.inputs
            .iter()
            .zip(&self.targets)
            .map(|(x, y)| (x.as_slice(), y.as_slice()))
    }
}

/// Two-input boolean functions available as toy datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Xor,
    And,
    Or,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gate::Xor => "xor",
            Gate::And => "and",
            Gate::Or => "or",
        })
    }
}

impl FromStr for Gate {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "xor" => Ok(Gate::Xor),
            "and" => Ok(Gate::And),
            "or" => Ok(Gate::Or),
            other => Err(NnError::InvalidConfig(format!(
                "unknown dataset '{other}' (expected xor, and or or)"
            ))),
        }
    }
}
