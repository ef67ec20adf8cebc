//! Command-line argument definitions.

use ad_nn::{Activation, Gate, TrainConfig};
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "ad")]
#[command(version)]
#[command(about = "Scalar reverse-mode autodiff: gradient demo and toy MLP training")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Log level implied by the flags; `RUST_LOG` still takes precedence.
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            LevelFilter::Error
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Differentiate a small expression and check it against finite differences
    Demo(DemoArgs),

    /// Train an MLP on a two-input logic gate
    Train(TrainArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DemoArgs {
    /// Value of x
    #[arg(long, default_value_t = 1.5, allow_negative_numbers = true)]
    pub x: f64,

    /// Value of y
    #[arg(long, default_value_t = 2.5, allow_negative_numbers = true)]
    pub y: f64,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TrainArgs {
    /// Truth table to learn (xor, and, or)
    #[arg(short, long, default_value = "xor")]
    pub dataset: Gate,

    /// Hidden layer widths, comma separated
    #[arg(long, value_delimiter = ',', default_value = "8")]
    pub hidden: Vec<usize>,

    /// Hidden layer activation (linear, relu, tanh, sigmoid)
    #[arg(short, long, default_value = "tanh")]
    pub activation: Activation,

    /// Number of full-batch epochs
    #[arg(short, long, default_value_t = 500)]
    pub epochs: usize,

    /// Learning rate
    #[arg(long, default_value_t = 0.1)]
    pub lr: f64,

    /// Momentum coefficient in [0, 1)
    #[arg(short, long, default_value_t = 0.9)]
    pub momentum: f64,

    /// Seed for weight initialization
    #[arg(short, long, default_value_t = 1337)]
    pub seed: u64,

    /// Log the loss every this many epochs (0 disables)
    #[arg(long, default_value_t = 50)]
    pub log_every: usize,
}

impl TrainArgs {
    pub fn config(&self) -> TrainConfig {
        TrainConfig {
            epochs: self.epochs,
            learning_rate: self.lr,
            momentum: self.momentum,
            log_every: self.log_every,
        }
    }

    /// Layer widths for the model: the hidden widths followed by one output.
    pub fn layer_sizes(&self) -> Vec<usize> {
        let mut sizes = self.hidden.clone();
        sizes.push(1);
        sizes
    }
}
